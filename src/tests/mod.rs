pub mod test_charts;
pub mod test_driver;
pub mod test_text_plots;

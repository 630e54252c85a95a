pub mod config;
pub mod faq;
pub mod run;
pub mod simulate;

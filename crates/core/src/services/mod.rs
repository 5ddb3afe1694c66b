pub mod portfolio_service;
pub mod report_service;
pub mod valuation_service;

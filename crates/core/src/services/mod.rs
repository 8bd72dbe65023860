pub mod chart_service;
pub mod navigation_service;
pub mod performance_service;
pub mod trade_service;
pub mod user_service;

pub mod commission_engine;
pub mod commission_service;
pub mod dashboard_service;
pub mod property_service;
pub mod query;
pub mod sale_service;
pub mod team_service;

pub use commission_service::CommissionService;
pub use dashboard_service::DashboardService;
pub use property_service::PropertyService;
pub use sale_service::SaleService;
pub use team_service::TeamService;

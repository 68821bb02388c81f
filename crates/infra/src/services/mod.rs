//! Application services: validation + orchestration over the store seams.
//!
//! Services are thin on purpose — the domain crates own the rules, the stores
//! own atomicity. What lives here is clock access, input validation through
//! the domain constructors, and structured logging around writes.

pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod sellers;

pub use products::ProductService;
pub use purchases::PurchaseService;
pub use reports::ReportService;
pub use sales::SaleService;
pub use sellers::SellerService;

pub mod aggregation;
pub mod database;
pub mod jwt;
pub mod metrics;
pub mod pdf;
pub mod report;
pub mod repository;
pub mod storage;

pub use database::MongoDb;
pub use jwt::{AccessTokenClaims, JwtService};
pub use repository::{
    PaymentRepository, PluckerRepository, RecordRepository, ReportRepository, UserRepository,
};
pub use storage::{LocalStorage, Storage};

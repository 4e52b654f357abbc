mod payment;
mod plucker;
mod record;
mod report;
mod user;

pub use payment::{Payment, PaymentDetail, PaymentStatus};
pub use plucker::{Plucker, PluckerStatus};
pub use record::{PluckerDetail, Record};
pub use report::{Report, ReportKind};
pub use user::User;

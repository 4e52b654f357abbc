mod auth;
mod payments;
mod pluckers;
mod records;
mod reports;

pub use auth::{
    LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest, UserResponse,
};
pub use payments::{
    CreatePaymentRequest, GeneratePaymentRequest, PaymentDetailRequest, PaymentDraftDetail,
    PaymentDraftResponse, PaymentListParams, PaymentResponse, PluckerSummary,
    PopulatedPaymentDetail, UpdatePaymentRequest,
};
pub use pluckers::{
    CreatePluckerRequest, PluckerResponse, TopPluckersParams, UpdatePluckerRequest,
};
pub use records::{
    CreateRecordRequest, PluckerDetailRequest, PluckerDetailResponse, RecordResponse,
    UpdateRecordRequest,
};
pub use reports::{
    DashboardStats, DashboardStatsResponse, ReportRangeParams, ReportResponse,
};

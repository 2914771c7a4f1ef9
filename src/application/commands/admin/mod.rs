mod approve;
mod change_status;
mod reject;
mod service;
mod stage;

pub use approve::ApproveProfessionalCommand;
pub use change_status::ChangeUserStatusCommand;
pub use reject::RejectProfessionalCommand;
pub use service::{AdminCommandService, AdminRequest};
pub use stage::AdminActionStage;

mod admin;
mod page;
mod proto_enum;
mod provisioner;
mod timestamp;

pub use admin::{Admin, AdminType, CreateAdminRequest, UpdateAdminRequest};
pub use page::{AdminsPage, ProvisionersPage};
pub use provisioner::{Provisioner, ProvisionerType};
pub use timestamp::Timestamp;

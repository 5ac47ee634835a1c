mod tenant_id;

pub use tenant_id::TenantId;

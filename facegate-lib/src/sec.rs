pub mod authn;

pub const SESSION_KEY_INFO: &[u8] = b"facegate.sessions";

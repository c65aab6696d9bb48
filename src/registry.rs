use std::ops::Deref;

pub const DEFAULT_PORT: &str = "22";

/// One configured SSH target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerRecord {
    pub name: String,
    pub host: String,
    pub username: String,
    pub port: String,
}

impl ServerRecord {
    /// `user@host`, the destination handed to ssh.
    pub fn target(&self) -> String {
        format!("{}@{}", self.username, self.host)
    }
}

/// The servers loaded at startup, in file order. Never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    servers: Vec<ServerRecord>,
}

impl Registry {
    pub fn new(servers: Vec<ServerRecord>) -> Self {
        Self { servers }
    }
}

impl Deref for Registry {
    type Target = [ServerRecord];

    fn deref(&self) -> &Self::Target {
        &self.servers
    }
}

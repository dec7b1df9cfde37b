use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub listeners: Option<HashMap<String, Listener>>,
    pub data: Option<PathBuf>,
    pub db: Option<Db>,
    pub sec: Option<Sec>,
    pub external: Option<External>,
}

#[derive(Debug, Deserialize)]
pub struct Listener {
    pub addr: SocketAddr,
}

#[derive(Debug, Deserialize)]
pub struct Db {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Sec {
    pub session: Option<Session>,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub secure: Option<bool>,
    pub domain: Option<String>,
    pub secrets: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct External {
    pub identity: Option<Identity>,
    pub sms: Option<Sms>,
    pub mail: Option<Mail>,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
    pub endpoint: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Sms {
    pub endpoint: Option<String>,
    pub account: Option<String>,
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Mail {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub sender: Option<String>,
}

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{self, Context};

mod shape;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// a config path or directory to load file from
    #[arg(long)]
    config: Vec<PathBuf>
}

#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
}

impl Config {
    pub fn from_args(args: CliArgs) -> error::Result<Self> {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for Settings")?;
        let mut settings = Settings::default();

        for config_path in args.config {
            let full = if config_path.is_absolute() {
                config_path
            } else {
                cwd.join(config_path)
            };

            tracing::debug!("loading config file \"{}\"", full.display());

            let file = std::fs::File::open(&full)
                .context(format!("failed to open config file \"{}\"", full.display()))?;

            let loaded: shape::Settings = serde_yaml::from_reader(file)
                .context(format!("failed to parse config file \"{}\"", full.display()))?;

            settings.merge(loaded);
        }

        {
            let meta = std::fs::metadata(&settings.data).context(
                "failed to retrieve metadata for settings.data"
            )?;

            if !meta.is_dir() {
                return Err(error::Error::new().message(
                    "settings.data is not a directory"
                ));
            }
        }

        if settings.sec.session.secrets.is_empty() {
            tracing::warn!("no session secrets configured. session tokens will not be keyed");
        }

        Ok(Config { settings })
    }
}

pub fn get_config() -> error::Result<Config> {
    Config::from_args(CliArgs::parse())
}

#[derive(Debug)]
pub struct Settings {
    pub listeners: HashMap<String, Listener>,
    pub data: PathBuf,
    pub db: Db,
    pub sec: Sec,
    pub external: External,
}

impl Settings {
    fn merge(&mut self, given: shape::Settings) {
        if let Some(listeners) = given.listeners {
            for (key, listener) in listeners {
                self.listeners.insert(key, Listener { addr: listener.addr });
            }
        }

        if let Some(data) = given.data {
            self.data = data;
        }

        if let Some(db) = given.db {
            self.db.merge(db);
        }

        if let Some(sec) = given.sec {
            self.sec.merge(sec);
        }

        if let Some(external) = given.external {
            self.external.merge(external);
        }
    }
}

impl std::default::Default for Settings {
    fn default() -> Self {
        Settings {
            listeners: HashMap::from([(
                String::from("main"),
                Listener {
                    addr: SocketAddr::from(([0, 0, 0, 0], 3000))
                }
            )]),
            data: PathBuf::from("data"),
            db: Db::default(),
            sec: Sec::default(),
            external: External::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Listener {
    pub addr: SocketAddr,
}

#[derive(Debug)]
pub struct Db {
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub dbname: String,
}

impl Db {
    fn merge(&mut self, given: shape::Db) {
        if let Some(user) = given.user {
            self.user = user;
        }

        if given.password.is_some() {
            self.password = given.password;
        }

        if let Some(host) = given.host {
            self.host = host;
        }

        if let Some(port) = given.port {
            self.port = port;
        }

        if let Some(dbname) = given.dbname {
            self.dbname = dbname;
        }
    }
}

impl std::default::Default for Db {
    fn default() -> Self {
        Db {
            user: String::from("postgres"),
            password: None,
            host: String::from("localhost"),
            port: 5432,
            dbname: String::from("facegate"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Sec {
    pub session: Session,
}

impl Sec {
    fn merge(&mut self, given: shape::Sec) {
        if let Some(session) = given.session {
            self.session.merge(session);
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub secure: bool,
    pub domain: Option<String>,

    /// newest first. older entries stay valid for decode until dropped
    pub secrets: Vec<String>,
}

impl Session {
    fn merge(&mut self, given: shape::Session) {
        if let Some(secure) = given.secure {
            self.secure = secure;
        }

        if given.domain.is_some() {
            self.domain = given.domain;
        }

        if let Some(secrets) = given.secrets {
            self.secrets = secrets;
        }
    }
}

impl std::default::Default for Session {
    fn default() -> Self {
        Session {
            secure: true,
            domain: None,
            secrets: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct External {
    pub identity: Identity,
    pub sms: Sms,
    pub mail: Mail,
}

impl External {
    fn merge(&mut self, given: shape::External) {
        if let Some(identity) = given.identity {
            if let Some(endpoint) = identity.endpoint {
                self.identity.endpoint = endpoint;
            }

            if identity.audience.is_some() {
                self.identity.audience = identity.audience;
            }
        }

        if let Some(sms) = given.sms {
            if let Some(endpoint) = sms.endpoint {
                self.sms.endpoint = endpoint;
            }

            if let Some(account) = sms.account {
                self.sms.account = account;
            }

            if let Some(secret) = sms.secret {
                self.sms.secret = secret;
            }
        }

        if let Some(mail) = given.mail {
            if let Some(endpoint) = mail.endpoint {
                self.mail.endpoint = endpoint;
            }

            if let Some(api_key) = mail.api_key {
                self.mail.api_key = api_key;
            }

            if let Some(sender) = mail.sender {
                self.mail.sender = sender;
            }
        }
    }
}

#[derive(Debug)]
pub struct Identity {
    pub endpoint: String,
    pub audience: Option<String>,
}

impl std::default::Default for Identity {
    fn default() -> Self {
        Identity {
            endpoint: String::from("https://oauth2.googleapis.com/tokeninfo"),
            audience: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Sms {
    pub endpoint: String,
    pub account: String,
    pub secret: String,
}

#[derive(Debug, Default)]
pub struct Mail {
    pub endpoint: String,
    pub api_key: String,
    pub sender: String,
}

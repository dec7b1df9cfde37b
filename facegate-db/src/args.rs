pub mod db {
    use clap::{Arg, ArgAction, value_parser};

    pub fn connect() -> Arg {
        Arg::new("connect")
            .short('c')
            .long("connect")
            .action(ArgAction::Set)
            .help("connection string for postgres")
            .conflicts_with_all([
                "user",
                "password",
                "req_password",
                "host",
                "port",
                "dbname",
            ])
    }

    pub fn user() -> Arg {
        Arg::new("user")
            .short('u')
            .long("user")
            .action(ArgAction::Set)
            .default_value("postgres")
            .help("user to connect to postgres with")
    }

    pub fn password() -> Arg {
        Arg::new("password")
            .long("password")
            .action(ArgAction::Set)
            .help("password for the postgres user")
    }

    pub fn req_password() -> Arg {
        Arg::new("req_password")
            .short('p')
            .long("req-password")
            .action(ArgAction::SetTrue)
            .conflicts_with("password")
            .help("prompts for the postgres user password")
    }

    pub fn host() -> Arg {
        Arg::new("host")
            .long("host")
            .action(ArgAction::Set)
            .default_value("localhost")
            .help("host of the postgres server")
    }

    pub fn port() -> Arg {
        Arg::new("port")
            .long("port")
            .action(ArgAction::Set)
            .value_parser(value_parser!(u16))
            .default_value("5432")
            .help("port of the postgres server")
    }

    pub fn dbname() -> Arg {
        Arg::new("dbname")
            .long("dbname")
            .action(ArgAction::Set)
            .default_value("facegate")
            .help("database name to connect to")
    }
}

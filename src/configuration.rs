use std::{
    env, fs,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;

use crate::{
    error::Error,
    provider::{WebPush, HTTP},
    push::{Dispatcher, EnvelopeDefaults, PushDelivery},
    registry::SubscriptionRegistry,
    types::Urgency,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub registry: SubscriptionRegistry,
    pub dispatcher: Dispatcher,
    pub envelope: EnvelopeDefaults,
}

impl State {
    pub fn new(config: Config) -> Result<State, Error> {
        let http = HTTP::new(config.clone())?;
        let web_push = WebPush::new(config.clone(), http)?;

        Ok(Self::with_delivery(config, Arc::new(web_push)))
    }

    /// Build the state around an arbitrary delivery capability. The
    /// registry always starts empty.
    pub fn with_delivery(
        config: Config,
        delivery: Arc<dyn PushDelivery>,
    ) -> State {
        let dispatcher = Dispatcher::new(
            delivery,
            config.max_tasks,
            Duration::from_secs(config.timeout),
            config.status_code_to_delete.clone(),
        );
        let envelope = EnvelopeDefaults {
            title: config.notification_title.to_owned(),
            icon: config.notification_icon.to_owned(),
            badge: config.notification_badge.to_owned(),
        };

        Self {
            config,
            registry: SubscriptionRegistry::new(),
            dispatcher,
            envelope,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub timeout: u64,
    pub max_tasks: usize,
    pub status_code_to_delete: Vec<u16>,
    pub mail_to: String,
    pub vapid_private_key: Vec<u8>,
    pub vapid_public_key: String,
    pub push_ttl: i64,
    pub push_urgency: Urgency,
    pub notification_title: String,
    pub notification_icon: String,
    pub notification_badge: String,
}

fn manifest_path(value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
}

fn parse_config_vapid_keys() -> Result<(Vec<u8>, String), Error> {
    let private_key_dir = manifest_path(&env::var("VAPID_PRIVATE_KEY")?);
    let public_key_dir = manifest_path(&env::var("VAPID_PUBLIC_KEY")?);

    let private_key = fs::read(&private_key_dir).with_context(|| {
        format!("VAPID private key {}", private_key_dir.display())
    })?;
    let public_key = fs::read_to_string(&public_key_dir).with_context(|| {
        format!("VAPID public key {}", public_key_dir.display())
    })?;

    Ok((private_key, public_key.trim().to_owned()))
}

fn parse_list(value: String) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn get_configuration() -> Result<Config, Error> {
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = parse_list(env::var("ALLOWED_ORIGINS")?);
    let static_dir = manifest_path(&env::var("STATIC_DIRECTORY")?)
        .to_string_lossy()
        .into_owned();
    let timeout = env::var("TIMEOUT")?.parse()?;
    let max_tasks = env::var("MAX_TASKS")?.parse()?;

    let codes = parse_list(
        env::var("STATUS_CODE_TO_DELETE")
            .unwrap_or_else(|_| String::from("404,410")),
    );
    let mut status_code_to_delete = vec![];

    for code in codes {
        status_code_to_delete.push(code.parse::<u16>()?);
    }

    let mail_to: String = env::var("MAIL_TO")?;
    let (vapid_private_key, vapid_public_key) = parse_config_vapid_keys()?;

    let push_ttl = env::var("PUSH_TTL")?.parse()?;
    let push_urgency = env::var("PUSH_URGENCY")?.parse()?;
    let notification_title = env::var("NOTIFICATION_TITLE")?;
    let notification_icon = env::var("NOTIFICATION_ICON")?;
    let notification_badge = env::var("NOTIFICATION_BADGE")?;

    let config = Config {
        server_host,
        port,
        allowed_origins,
        static_dir,
        timeout,
        max_tasks,
        status_code_to_delete,
        mail_to,
        vapid_private_key,
        vapid_public_key,
        push_ttl,
        push_urgency,
        notification_title,
        notification_icon,
        notification_badge,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";
    let push_config_file: &str = "push.conf";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);
    let push_config_path = format!("{}/{}", directory, push_config_file);

    let config_string = fs::read_to_string(path)?;
    let push_config_string = fs::read_to_string(push_config_path)?;

    for (key, value) in parse_config_string(&config_string)
        .into_iter()
        .chain(parse_config_string(&push_config_string))
    {
        env::set_var(key, value);
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(&str, &str)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            line.split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
        })
        .collect()
}

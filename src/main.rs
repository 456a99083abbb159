use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use contentgen::cli::{Args, Command, ProviderKind};
use contentgen::clipboard::SystemClipboard;
use contentgen::config::Config;
use contentgen::form::{ApiSettings, FormStore};
use contentgen::generate::Generator;
use contentgen::session::{Reply, Session, UserCommand};
use contentgen::settings::{CustomApi, ProviderSettings};
use contentgen::storage::{FileStore, PersistenceService};
use contentgen::wizard::{Flow, StepId};
use contentgen::{log, ux};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::init(args.debug);

    let cfg = Config::from_args(&args)?;
    let store = FileStore::in_root(Path::new(&cfg.root)).context("opening storage")?;
    tracing::debug!(path = %store.path().display(), "storage opened");
    let storage: Arc<dyn PersistenceService> = Arc::new(store);

    match args.command {
        Command::Wizard { flow } => run_wizard(flow.into(), cfg, storage).await,
        Command::Providers { set, model, custom_endpoint, custom_key, custom_model, insecure } => {
            let settings = ProviderSettings::new(storage);
            if let Some(provider) = set {
                let model = model.unwrap_or_else(|| provider.default_model().to_string());
                settings.set_preferred(&ApiSettings { provider, model })?;
            }
            if custom_endpoint.is_some() || custom_key.is_some() || custom_model.is_some() || insecure {
                let mut custom = settings.custom()?.unwrap_or_default();
                if let Some(e) = custom_endpoint {
                    custom.endpoint = e;
                }
                if let Some(k) = custom_key {
                    custom.api_key = k;
                }
                if let Some(m) = custom_model {
                    custom.model = m;
                }
                custom.verify_ssl = !insecure;
                settings.set_custom(&custom)?;
            }
            let default = ApiSettings { provider: cfg.provider, model: cfg.model.clone() };
            let custom: Option<CustomApi> = settings.custom()?;
            ux::show_providers(settings.preferred()?.as_ref(), custom.as_ref(), &default);
            Ok(())
        }
        Command::Schema { flow } => {
            let mut form = FormStore::open(storage, Flow::from(flow).storage_key())?;
            let markup = Generator::new(cfg.max_tokens.clone()).schema(&mut form, &cfg.schema)?;
            println!("{markup}");
            Ok(())
        }
        Command::Reset { flow } => {
            let flow = Flow::from(flow);
            if !ux::confirm(&format!("Forget all saved {} data?", flow.as_str())) {
                println!("Aborted.");
                return Ok(());
            }
            FormStore::open(storage, flow.storage_key())?.reset()?;
            println!("Cleared {} form data.", flow.as_str());
            Ok(())
        }
    }
}

async fn run_wizard(flow: Flow, cfg: Config, storage: Arc<dyn PersistenceService>) -> anyhow::Result<()> {
    if cfg.provider != ProviderKind::Custom && cfg.provider.key_env().is_some_and(|v| std::env::var(v).is_err()) {
        tracing::warn!(provider = %cfg.provider, "no API key in the environment for the default provider");
    }

    let mut session = Session::open(flow, cfg, storage, Box::new(SystemClipboard::default()))?;
    ux::show_step(session.wizard(), session.data());
    ux::show_message("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        ux::prompt_marker(session.step());
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let cmd = match UserCommand::parse(&line) {
            Ok(c) => c,
            Err(e) => {
                ux::show_error(&e);
                continue;
            }
        };

        let reply = if cmd == UserCommand::Generate {
            let pb = ux::spinner(format!("generating {}...", session.step()));
            let r = session.handle(cmd).await;
            pb.finish_and_clear();
            r
        } else {
            session.handle(cmd).await
        };

        match reply {
            Ok(Reply::Message(m)) => ux::show_message(&m),
            Ok(Reply::Candidates(c)) => {
                ux::show_candidates(&c, "");
                if matches!(session.step(), StepId::Title | StepId::Description) {
                    ux::show_message("`pick <n>` to choose");
                }
            }
            Ok(Reply::Text(t)) => ux::show_text(&t),
            Ok(Reply::Moved) => ux::show_step(session.wizard(), session.data()),
            Ok(Reply::Superseded) => ux::show_message("a newer request replaced this result"),
            Ok(Reply::Finished) => {
                ux::show_finished(flow.as_str());
                break;
            }
            Ok(Reply::Quit) => break,
            Err(e) => ux::show_error(&e),
        }
    }
    Ok(())
}

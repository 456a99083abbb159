use clap::ValueEnum;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::cli::ProviderKind;
use crate::clipboard::ClipboardSink;
use crate::config::Config;
use crate::errors::{Result, WizardError};
use crate::form::{ApiSettings, ArticleSize, FormData, FormPatch, FormStore, Niche, SeoLevel, Tone};
use crate::generate::{Generated, Generator, Output};
use crate::provider::make_provider;
use crate::settings::ProviderSettings;
use crate::storage::PersistenceService;
use crate::wizard::{Flow, NextOutcome, StepId, WizardController};

/// One line typed at the wizard prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Generate,
    Pick(usize),
    Set(String, String),
    Toggle(String),
    UseProvider(ProviderKind, Option<String>),
    Next,
    Back,
    Goto(usize),
    Copy,
    Show,
    Help,
    Quit,
}

impl UserCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let number = |what: &str| -> Result<usize> {
            rest.parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| WizardError::MissingInput(format!("{what} needs a number starting at 1")))
        };

        let cmd = match head.to_ascii_lowercase().as_str() {
            "gen" | "generate" | "g" => UserCommand::Generate,
            "pick" | "p" => UserCommand::Pick(number("pick")?),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(WizardError::MissingInput("usage: set <field> <value>".into()));
                }
                UserCommand::Set(field.to_ascii_lowercase(), value.trim().to_string())
            }
            "toggle" | "t" => {
                if rest.is_empty() {
                    return Err(WizardError::MissingInput("usage: toggle <element>".into()));
                }
                UserCommand::Toggle(rest.to_string())
            }
            "use" => {
                let mut parts = rest.split_whitespace();
                let kind = parts
                    .next()
                    .and_then(|p| ProviderKind::from_str(p, true).ok())
                    .ok_or_else(|| WizardError::MissingInput("usage: use <provider> [model]".into()))?;
                UserCommand::UseProvider(kind, parts.next().map(str::to_string))
            }
            "next" | "n" => UserCommand::Next,
            "back" | "b" | "prev" => UserCommand::Back,
            "goto" => UserCommand::Goto(number("goto")?),
            "copy" | "c" => UserCommand::Copy,
            "show" | "s" | "" => UserCommand::Show,
            "help" | "h" | "?" => UserCommand::Help,
            "quit" | "q" | "exit" => UserCommand::Quit,
            other => return Err(WizardError::MissingInput(format!("unknown command `{other}` (try `help`)"))),
        };
        Ok(cmd)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Message(String),
    Candidates(Vec<String>),
    Text(String),
    /// The step changed; render the new one.
    Moved,
    /// Discarded because a newer request of the same kind was issued.
    Superseded,
    Finished,
    Quit,
}

/// A running wizard: form data, navigation and generation wired together.
pub struct Session {
    cfg: Config,
    store: FormStore,
    wizard: WizardController,
    generator: Generator,
    settings: ProviderSettings,
    clipboard: Box<dyn ClipboardSink>,
    run: Uuid,
}

impl Session {
    pub fn open(
        flow: Flow,
        cfg: Config,
        storage: Arc<dyn PersistenceService>,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Result<Self> {
        let store = FormStore::open(storage.clone(), flow.storage_key())?;
        let wizard = WizardController::new(flow, store.data());
        let generator = Generator::new(cfg.max_tokens.clone());
        Ok(Self {
            store,
            wizard,
            generator,
            settings: ProviderSettings::new(storage),
            clipboard,
            run: Uuid::new_v4(),
            cfg,
        })
    }

    pub fn data(&self) -> &FormData {
        self.store.data()
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn step(&self) -> StepId {
        self.wizard.current_step()
    }

    fn update(&mut self, patch: FormPatch) -> Result<()> {
        self.store.update(patch)?;
        self.wizard.refresh(self.store.data());
        Ok(())
    }

    pub async fn handle(&mut self, cmd: UserCommand) -> Result<Reply> {
        match cmd {
            UserCommand::Generate => self.generate().await,
            UserCommand::Pick(n) => self.pick(n),
            UserCommand::Set(field, value) => self.set_field(&field, &value),
            UserCommand::Toggle(name) => {
                let mut elements = self.data().elements.clone();
                let on = elements
                    .toggle(&name)
                    .ok_or_else(|| WizardError::MissingInput(format!("unknown element `{name}`")))?;
                self.update(FormPatch { elements: Some(elements), ..Default::default() })?;
                Ok(Reply::Message(format!("{name}: {}", if on { "on" } else { "off" })))
            }
            UserCommand::UseProvider(provider, model) => {
                let model = model.unwrap_or_else(|| provider.default_model().to_string());
                let choice = ApiSettings { provider, model };
                self.settings.set_step_override(self.step(), Some(&choice))?;
                Ok(Reply::Message(format!("{} step now uses {} ({})", self.step(), choice.provider, choice.model)))
            }
            UserCommand::Next => match self.wizard.next(self.store.data())? {
                NextOutcome::Advanced(_) => Ok(Reply::Moved),
                NextOutcome::Finished => Ok(Reply::Finished),
            },
            UserCommand::Back => {
                self.wizard.previous();
                Ok(Reply::Moved)
            }
            UserCommand::Goto(n) => {
                if self.wizard.go_to(zero_based(n)?) {
                    Ok(Reply::Moved)
                } else {
                    Ok(Reply::Message(format!("step {n} is not reachable yet")))
                }
            }
            UserCommand::Copy => {
                let text = self.current_output();
                if text.trim().is_empty() {
                    return Err(WizardError::MissingInput("nothing to copy on this step".into()));
                }
                self.clipboard.copy(&text)?;
                Ok(Reply::Message("copied to clipboard".into()))
            }
            UserCommand::Show => Ok(Reply::Moved),
            UserCommand::Help => Ok(Reply::Message(HELP.into())),
            UserCommand::Quit => Ok(Reply::Quit),
        }
    }

    /// The value this step produces, for `copy`.
    pub fn current_output(&self) -> String {
        let d = self.data();
        match self.step() {
            StepId::Keyword => d.focus_keyword.clone(),
            StepId::Title => d.meta_title.clone(),
            StepId::Description => d.meta_description.clone(),
            StepId::Tags => d.tags.clone(),
            StepId::Article => d.generated_article.clone(),
            StepId::Schema => d.schema_markup.clone(),
            StepId::Prompt => d.generated_prompt.clone(),
            StepId::Settings | StepId::Advanced => String::new(),
        }
    }

    async fn generate(&mut self) -> Result<Reply> {
        let step = self.step();
        match step {
            StepId::Schema => {
                let markup = self.generator.schema(&mut self.store, &self.cfg.schema)?;
                self.wizard.refresh(self.store.data());
                return Ok(Reply::Text(markup));
            }
            StepId::Prompt => {
                let text = self.generator.prompt_text(&mut self.store)?;
                self.wizard.refresh(self.store.data());
                return Ok(Reply::Text(text));
            }
            StepId::Title | StepId::Description | StepId::Tags | StepId::Article => {}
            other => {
                return Err(WizardError::MissingInput(format!("nothing to generate on the {other} step")));
            }
        }

        let choice = self.settings.resolve(step, self.data().api_settings.as_ref(), &self.cfg)?;
        let provider_cfg = self.settings.provider_config(&choice)?;
        let provider = make_provider(&provider_cfg, self.cfg.timeout_secs)?;

        let data = self.data().clone();
        let generated = match step {
            StepId::Title => self.generator.titles(provider.as_ref(), &data).await?,
            StepId::Description => self.generator.descriptions(provider.as_ref(), &data).await?,
            StepId::Tags => self.generator.tags(provider.as_ref(), &data).await?,
            _ => self.generator.article(provider.as_ref(), &data).await?,
        };
        self.save_artifacts(step, &generated);

        let output = generated.output.clone();
        if !self.generator.accept(&mut self.store, generated)? {
            return Ok(Reply::Superseded);
        }
        self.wizard.refresh(self.store.data());

        Ok(match output {
            Output::Titles(v) | Output::Descriptions(v) | Output::Tags(v) => Reply::Candidates(v),
            Output::Article(a) => Reply::Text(a),
        })
    }

    fn save_artifacts(&self, step: StepId, generated: &Generated) {
        if !self.cfg.save_prompts {
            return;
        }
        let root = PathBuf::from(&self.cfg.root);
        if let Err(e) = crate::log::save_generation(&root, self.run, step.as_str(), &generated.prompt, &generated.raw) {
            tracing::warn!(error = %e, "could not save generation artifacts");
        }
    }

    fn pick(&mut self, n: usize) -> Result<Reply> {
        let step = self.step();
        let list = match step {
            StepId::Title => &self.data().generated_titles,
            StepId::Description => &self.data().generated_descriptions,
            other => return Err(WizardError::MissingInput(format!("nothing to pick on the {other} step"))),
        };
        let choice = list
            .get(zero_based(n)?)
            .cloned()
            .ok_or_else(|| WizardError::MissingInput(format!("no candidate #{n}; run `gen` first")))?;
        let patch = if step == StepId::Title {
            FormPatch { meta_title: Some(choice.clone()), ..Default::default() }
        } else {
            FormPatch { meta_description: Some(choice.clone()), ..Default::default() }
        };
        self.update(patch)?;
        Ok(Reply::Message(format!("selected: {choice}")))
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<Reply> {
        fn parse_enum<T: ValueEnum>(what: &str, value: &str) -> Result<T> {
            T::from_str(value, true).map_err(|_| WizardError::MissingInput(format!("invalid {what}: `{value}`")))
        }
        let text = || Some(value.to_string());
        let mut advanced = self.data().advanced.clone();

        let patch = match field {
            "keyword" | "focus-keyword" => FormPatch { focus_keyword: text(), ..Default::default() },
            "title" => FormPatch { meta_title: text(), ..Default::default() },
            "description" => FormPatch { meta_description: text(), ..Default::default() },
            "tags" => FormPatch { tags: text(), ..Default::default() },
            "niche" => FormPatch { niche: Some(parse_enum::<Niche>("niche", value)?), ..Default::default() },
            "seo" | "seo-level" => {
                FormPatch { seo_level: Some(parse_enum::<SeoLevel>("SEO level", value)?), ..Default::default() }
            }
            "tone" => FormPatch { tone: Some(parse_enum::<Tone>("tone", value)?), ..Default::default() },
            "size" | "article-size" => {
                FormPatch { article_size: Some(parse_enum::<ArticleSize>("article size", value)?), ..Default::default() }
            }
            "advanced" => {
                advanced.enabled = matches!(value.to_ascii_lowercase().as_str(), "on" | "true" | "yes" | "1");
                FormPatch { advanced: Some(advanced), ..Default::default() }
            }
            "internal-link" => {
                advanced.internal_link_url = value.to_string();
                FormPatch { advanced: Some(advanced), ..Default::default() }
            }
            "external-link" => {
                advanced.external_link_url = value.to_string();
                FormPatch { advanced: Some(advanced), ..Default::default() }
            }
            "instructions" => {
                advanced.custom_instructions = value.to_string();
                FormPatch { advanced: Some(advanced), ..Default::default() }
            }
            other => return Err(WizardError::MissingInput(format!("unknown field `{other}`"))),
        };
        self.update(patch)?;
        Ok(Reply::Message(format!("{field} updated")))
    }
}

/// Command numbers are 1-based on screen.
fn zero_based(n: usize) -> Result<usize> {
    n.checked_sub(1)
        .ok_or_else(|| WizardError::MissingInput("numbers start at 1".into()))
}

pub const HELP: &str = "\
commands:
  gen                   generate for the current step
  pick <n>              choose candidate n (title/description steps)
  set <field> <value>   keyword, title, description, tags, niche, seo, tone, size,
                        advanced on|off, internal-link, external-link, instructions
  toggle <element>      bold, h3, lists, tables, internal-links, external-links, faq, key-takeaways
  use <provider> [model]  provider for this step only
  next | back | goto <n>
  copy                  copy this step's result to the clipboard
  show | help | quit";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::BufferClipboard;
    use crate::storage::MemoryStore;

    fn session(flow: Flow) -> Session {
        Session::open(flow, Config::default(), Arc::new(MemoryStore::new()), Box::new(BufferClipboard::default()))
            .unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(UserCommand::parse("gen").unwrap(), UserCommand::Generate);
        assert_eq!(UserCommand::parse("pick 3").unwrap(), UserCommand::Pick(3));
        assert_eq!(
            UserCommand::parse("set keyword vegan pasta").unwrap(),
            UserCommand::Set("keyword".into(), "vegan pasta".into())
        );
        assert_eq!(
            UserCommand::parse("use claude").unwrap(),
            UserCommand::UseProvider(ProviderKind::Claude, None)
        );
        assert!(UserCommand::parse("pick 0").is_err());
        assert!(UserCommand::parse("dance").is_err());
    }

    #[tokio::test]
    async fn keyword_then_next_moves_on() {
        let mut s = session(Flow::Article);
        assert!(s.handle(UserCommand::Next).await.is_err());
        s.handle(UserCommand::Set("keyword".into(), "vegan pasta".into())).await.unwrap();
        assert_eq!(s.handle(UserCommand::Next).await.unwrap(), Reply::Moved);
        assert_eq!(s.step(), StepId::Title);
    }

    #[tokio::test]
    async fn goto_unreachable_reports_and_stays() {
        let mut s = session(Flow::Article);
        let reply = s.handle(UserCommand::Goto(4)).await.unwrap();
        assert!(matches!(reply, Reply::Message(_)));
        assert_eq!(s.wizard().current_index(), 0);
    }

    #[tokio::test]
    async fn settings_are_parsed() {
        let mut s = session(Flow::Prompt);
        s.handle(UserCommand::Set("niche".into(), "real-estate".into())).await.unwrap();
        s.handle(UserCommand::Set("tone".into(), "Friendly".into())).await.unwrap();
        s.handle(UserCommand::Toggle("faq".into())).await.unwrap();
        assert_eq!(s.data().niche, Niche::RealEstate);
        assert_eq!(s.data().tone, Tone::Friendly);
        assert!(s.data().elements.faq);
        assert!(s.handle(UserCommand::Set("tone".into(), "angry".into())).await.is_err());
    }

    #[tokio::test]
    async fn advanced_toggle_changes_step_count() {
        let mut s = session(Flow::Prompt);
        assert_eq!(s.wizard().total_steps(), 3);
        s.handle(UserCommand::Set("advanced".into(), "on".into())).await.unwrap();
        assert_eq!(s.wizard().total_steps(), 4);
    }

    #[tokio::test]
    async fn generate_on_settings_step_is_rejected() {
        let mut s = session(Flow::Prompt);
        s.handle(UserCommand::Set("keyword".into(), "k".into())).await.unwrap();
        s.handle(UserCommand::Next).await.unwrap();
        assert!(matches!(s.handle(UserCommand::Generate).await, Err(WizardError::MissingInput(_))));
    }

    #[tokio::test]
    async fn zero_step_or_candidate_is_rejected() {
        let mut s = session(Flow::Article);
        s.handle(UserCommand::Set("keyword".into(), "k".into())).await.unwrap();
        assert!(matches!(s.handle(UserCommand::Goto(0)).await, Err(WizardError::MissingInput(_))));
        s.handle(UserCommand::Next).await.unwrap();
        assert!(matches!(s.handle(UserCommand::Pick(0)).await, Err(WizardError::MissingInput(_))));
        assert_eq!(s.step(), StepId::Title);
    }

    #[tokio::test]
    async fn pick_without_candidates_fails() {
        let mut s = session(Flow::Blog);
        s.handle(UserCommand::Set("keyword".into(), "k".into())).await.unwrap();
        s.handle(UserCommand::Next).await.unwrap();
        assert!(s.handle(UserCommand::Pick(1)).await.is_err());
    }
}

//! Core application

use anyhow::{Context, Result};
use serde_json::Value as Json;

use crate::adapters::DocumentAdapter;
use crate::adapters::sql::{Backend, SqlAdapter};
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::{AppConfig, Target};
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::filter::{FilterError, FilterRegistry, Node, Translator, export};

pub struct CoreApp<'r> {
    pub config: AppConfig,
    pub registry: &'r FilterRegistry,
}

impl CoreApp<'static> {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;
        let output = app.execute(command)?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let app = CoreApp::new(config, FilterRegistry::global());
        app.config.register(app.registry)?;
        tracing::debug!(output = %app.config.target, "Application initialized");
        Ok(app)
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

impl<'r> CoreApp<'r> {
    pub fn new(config: AppConfig, registry: &'r FilterRegistry) -> Self {
        Self { config, registry }
    }

    /// Execute a command and return its JSON output
    pub fn execute(&self, command: Commands) -> Result<Json> {
        match command {
            Commands::Entities => Ok(serde_json::to_value(self.registry.entities())?),
            Commands::Metadata { entity, group } => self.metadata(&entity, group.as_deref()),
            Commands::Translate {
                entity,
                group,
                expr,
            } => self.translate(&entity, group.as_deref(), &expr),
        }
    }

    fn ensure_entity(&self, entity: &str) -> Result<()> {
        if !self.registry.has_entity(entity) {
            anyhow::bail!("Unknown entity: {}", entity);
        }
        Ok(())
    }

    fn metadata(&self, entity: &str, group: Option<&str>) -> Result<Json> {
        self.ensure_entity(entity)?;
        let descriptors = self.registry.lookup(entity, group);
        let metadata = export(descriptors.iter().map(|d| d.as_ref()));
        Ok(serde_json::to_value(metadata)?)
    }

    fn translate(&self, entity: &str, group: Option<&str>, expr: &str) -> Result<Json> {
        self.ensure_entity(entity)?;
        let node: Node = serde_json::from_str(expr).context("Failed to parse expression tree")?;
        let fields = self.registry.lookup_as_map(entity, group).map_err(request_error)?;
        let translator = Translator::new(self.config.unknown_enum);

        tracing::debug!(entity = %entity, group = ?group, output = %self.config.target, "Translating expression");
        let output = match self.config.target {
            Target::Postgres | Target::Sqlite => {
                let backend = match self.config.target {
                    Target::Sqlite => Backend::Sqlite,
                    _ => Backend::Postgres,
                };
                let adapter = SqlAdapter::new(backend);
                let fragment = translator
                    .translate(&fields, &node, &adapter)
                    .map_err(request_error)?;
                serde_json::to_value(adapter.render(&fragment))?
            }
            Target::Document => translator
                .translate(&fields, &node, &DocumentAdapter::new())
                .map_err(request_error)?,
        };
        Ok(output)
    }
}

fn request_error(e: FilterError) -> anyhow::Error {
    anyhow::anyhow!("{} [{}]", e, e.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldDeclaration, SourceType};
    use serde_json::json;

    fn app(target: Target, registry: &FilterRegistry) -> CoreApp<'_> {
        registry.declare_group("auditor", &["staff"]);
        registry
            .register_declarations(
                "user",
                &[
                    FieldDeclaration::new("age", SourceType::U8).with_description("Age in years"),
                    FieldDeclaration::new("salary", SourceType::Decimal).with_groups(&["staff"]),
                ],
            )
            .unwrap();
        let config = AppConfig {
            target,
            ..Default::default()
        };
        CoreApp::new(config, registry)
    }

    fn translate(entity: &str, group: Option<&str>, expr: &str) -> Commands {
        Commands::Translate {
            entity: entity.to_string(),
            group: group.map(str::to_string),
            expr: expr.to_string(),
        }
    }

    #[test]
    fn test_entities_command() {
        let registry = FilterRegistry::new();
        let app = app(Target::Postgres, &registry);
        assert_eq!(app.execute(Commands::Entities).unwrap(), json!(["user"]));
    }

    #[test]
    fn test_metadata_command_respects_groups() {
        let registry = FilterRegistry::new();
        let app = app(Target::Postgres, &registry);

        let default_view = app
            .execute(Commands::Metadata {
                entity: "user".into(),
                group: None,
            })
            .unwrap();
        assert_eq!(default_view.as_array().unwrap().len(), 1);
        assert_eq!(default_view[0]["field"], "age");
        assert_eq!(default_view[0]["description"], "Age in years");

        let auditor_view = app
            .execute(Commands::Metadata {
                entity: "user".into(),
                group: Some("auditor".into()),
            })
            .unwrap();
        assert_eq!(auditor_view[1]["field"], "salary");
        assert_eq!(auditor_view[1]["value_type"], "decimal");
    }

    #[test]
    fn test_translate_command_sql() {
        let registry = FilterRegistry::new();
        let app = app(Target::Sqlite, &registry);
        let expr = r#"{"type":"comparison","selector":"salary","operator":"=gt=","arguments":["1000.50"]}"#;

        let output = app.execute(translate("user", Some("staff"), expr)).unwrap();
        assert_eq!(output, json!({ "sql": "\"salary\" > ?", "params": ["1000.50"] }));
    }

    #[test]
    fn test_translate_command_document() {
        let registry = FilterRegistry::new();
        let app = app(Target::Document, &registry);
        let expr = r#"{"type":"comparison","selector":"age","operator":"=in=","arguments":["1","2"]}"#;

        let output = app.execute(translate("user", None, expr)).unwrap();
        assert_eq!(output, json!({ "age": { "$in": [1, 2] } }));
    }

    #[test]
    fn test_translate_command_errors() {
        let registry = FilterRegistry::new();
        let app = app(Target::Postgres, &registry);

        let hidden = r#"{"type":"comparison","selector":"salary","operator":"==","arguments":["1"]}"#;
        let err = app.execute(translate("user", None, hidden)).unwrap_err();
        assert!(err.to_string().contains("UNKNOWN_FILTER_FIELD"));

        let err = app.execute(translate("ghost", None, hidden)).unwrap_err();
        assert!(err.to_string().contains("Unknown entity"));

        let err = app.execute(translate("user", None, "not json")).unwrap_err();
        assert!(err.to_string().contains("Failed to parse expression tree"));
    }
}

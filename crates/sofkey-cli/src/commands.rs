//! Subcommand handlers.

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use serde::Serialize;

use sofkey_core::{
    KeywordContext, KeywordService, Language, MatchKind, OsFileSystem, TextDocument, Validation,
};

#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    fn emit<T: Serialize>(self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let text = text();
            if !text.is_empty() {
                println!("{text}");
            }
        }
        Ok(())
    }
}

/// Build a context from `file`, read as a document, or from config alone.
pub fn context_for(service: &KeywordService, file: Option<&Path>) -> Result<KeywordContext> {
    match file {
        Some(path) => {
            let document = TextDocument::open(&OsFileSystem, path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(service.create_context(Some(&document), None))
        }
        None => Ok(service.create_context(None, None)),
    }
}

pub fn resolve(service: &KeywordService, file: Option<&Path>, out: Output) -> Result<()> {
    let ctx = context_for(service, file)?;
    out.emit(ctx.resolution(), || {
        format!("version:  {}\nlanguage: {}", ctx.version(), ctx.language())
    })
}

pub fn versions(service: &KeywordService, language: Option<&str>, out: Output) -> Result<()> {
    let language = language.map(parse_language).transpose()?;
    let versions = service.available_versions(language);
    out.emit(&versions, || versions.join("\n"))
}

pub fn modules(service: &KeywordService, file: Option<&Path>, out: Output) -> Result<()> {
    let ctx = context_for(service, file)?;
    let modules = ctx.list_modules();
    out.emit(&modules, || modules.join("\n"))
}

pub fn commands(
    service: &KeywordService,
    module: &str,
    file: Option<&Path>,
    out: Output,
) -> Result<()> {
    let ctx = context_for(service, file)?;
    let commands = ctx.list_commands(module);
    out.emit(&commands, || commands.join("\n"))
}

pub fn params(
    service: &KeywordService,
    module: &str,
    command: &str,
    file: Option<&Path>,
    out: Output,
) -> Result<()> {
    let ctx = context_for(service, file)?;
    let Some(params) = ctx.params(module, command) else {
        bail!("{module} {command} is not available in {}", describe(&ctx));
    };
    out.emit(params, || {
        params
            .iter()
            .map(|(name, values)| match values {
                Some(values) => format!("{name}: {}", values.join(", ")),
                None => name.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub fn enums(
    service: &KeywordService,
    module: &str,
    command: &str,
    param: &str,
    file: Option<&Path>,
    out: Output,
) -> Result<()> {
    let ctx = context_for(service, file)?;
    match ctx.enum_values(module, command, param) {
        None => bail!(
            "{module} {command} {param} is not available in {}",
            describe(&ctx)
        ),
        Some(values) => out.emit(&values, || match values {
            Some(values) => values.join("\n"),
            None => "(free-form)".to_string(),
        }),
    }
}

pub fn search(
    service: &KeywordService,
    term: &str,
    file: Option<&Path>,
    out: Output,
) -> Result<()> {
    let ctx = context_for(service, file)?;
    let hits = ctx.search(term);
    out.emit(&hits, || {
        hits.iter()
            .map(|m| match (&m.kind, &m.param) {
                (MatchKind::Param, Some(param)) => {
                    format!("param   {} {} {param}", m.module, m.command)
                }
                _ => format!("command {} {}", m.module, m.command),
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub fn validate(
    service: &KeywordService,
    word: &str,
    file: Option<&Path>,
    out: Output,
) -> Result<()> {
    let ctx = context_for(service, file)?;
    let hit = ctx.validate(word);
    out.emit(&hit, || match &hit {
        Some(Validation::Command { module, command, .. }) => {
            format!("{command} is a command of {module}")
        }
        Some(Validation::Param {
            module,
            command,
            param,
            ..
        }) => format!("{param} is a parameter of {module} {command}"),
        None => format!("{} is not a known keyword", word.to_uppercase()),
    })
}

pub fn stats(service: &KeywordService, file: Option<&Path>, out: Output) -> Result<()> {
    let ctx = context_for(service, file)?;
    let stats = ctx.statistics();
    out.emit(&stats, || {
        let mut lines = vec![
            format!("{} ({})", ctx.version(), ctx.language()),
            format!(
                "modules: {}  commands: {}  params: {}",
                stats.modules, stats.commands, stats.params
            ),
        ];
        for (module, s) in stats.per_module.iter() {
            lines.push(format!("  {module:<12} {:>4} {:>5}", s.commands, s.params));
        }
        lines.join("\n")
    })
}

fn parse_language(raw: &str) -> Result<Language> {
    match Language::normalize(raw) {
        Some(language) => Ok(language),
        None => bail!("unknown language '{raw}'"),
    }
}

fn describe(ctx: &KeywordContext) -> String {
    format!("SOFiSTiK {} ({})", ctx.version(), ctx.language())
}

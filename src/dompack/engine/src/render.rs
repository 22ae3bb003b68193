//! Template rendering capability
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

pub type RenderContext = BTreeMap<String, String>;

pub trait Render: Send + Sync {
    fn render(&self, template: &str, context: &RenderContext) -> anyhow::Result<String>;
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Substitutes `{{ key }}` with context values. Unknown keys render as empty string.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRender;

impl Render for PlaceholderRender {
    fn render(&self, template: &str, context: &RenderContext) -> anyhow::Result<String> {
        let out = PLACEHOLDER.replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            match context.get(key) {
                Some(value) => value.clone(),
                None => {
                    tracing::debug!(key, "template refers to unknown key");
                    String::new()
                }
            }
        });
        Ok(out.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_keys() {
        let mut ctx = RenderContext::new();
        ctx.insert("title".to_string(), "Cows".to_string());
        ctx.insert("color".to_string(), "00FF00".to_string());
        let out = PlaceholderRender
            .render(r"\begin{problem}{{{title}}}{color={{ color }}} {{missing}}!", &ctx)
            .unwrap();
        assert_eq!(out, r"\begin{problem}{Cows}{color=00FF00} !");
    }

    #[test]
    fn values_are_not_rescanned() {
        let mut ctx = RenderContext::new();
        ctx.insert("a".to_string(), "{{b}}".to_string());
        ctx.insert("b".to_string(), "x".to_string());
        assert_eq!(PlaceholderRender.render("{{a}}", &ctx).unwrap(), "{{b}}");
    }
}

//! Message catalog: the localization contract the core consumes.
//!
//! Storage and locale negotiation live outside the core; all it needs is
//! "give me message `KEY` in locale `xx` with these arguments". Templates
//! use sequential `%s` placeholders (`%%` for a literal percent sign).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{L10nError, Locale, Localized};

/// A message that is rendered per recipient, so every player reads it in
/// their own locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Pre-rendered text, delivered as is.
    Raw(String),
    /// A catalog key plus its arguments.
    Key { key: String, args: Vec<String> },
}

impl Message {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    pub fn key(key: impl Into<String>, args: &[&str]) -> Self {
        Self::Key {
            key: key.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Key → locale → template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageCatalog {
    #[serde(default)]
    default_locale: Locale,
    #[serde(default)]
    messages: BTreeMap<String, Localized>,
}

impl MessageCatalog {
    pub fn new(default_locale: Locale) -> Self {
        Self {
            default_locale,
            messages: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, L10nError> {
        Ok(serde_json::from_str(json)?)
    }

    /// English strings for every key the core emits.
    pub fn english_defaults() -> Self {
        let mut catalog = Self::new(Locale::default());
        for (key, template) in ENGLISH {
            catalog.insert(key, "en", template);
        }
        catalog
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    pub fn set_default_locale(&mut self, locale: Locale) {
        self.default_locale = locale;
    }

    pub fn insert(&mut self, key: &str, locale: &str, template: &str) {
        let entry = self.messages.entry(key.to_string()).or_default();
        *entry = std::mem::take(entry).with(locale, template);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: &str, locale: &str, template: &str) -> Self {
        self.insert(key, locale, template);
        self
    }

    /// Overlays every translation of `other` on top of this catalog.
    /// Locales `other` doesn't mention are kept.
    pub fn merge(&mut self, other: MessageCatalog) {
        for (key, texts) in other.messages {
            self.messages.entry(key).or_default().overlay(texts);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn translate(
        &self,
        locale: &Locale,
        key: &str,
        args: &[&str],
    ) -> Result<String, L10nError> {
        let texts = self
            .messages
            .get(key)
            .ok_or_else(|| L10nError::UnknownKey(key.to_string()))?;
        let template = texts
            .get(locale)
            .or_else(|| texts.get(&self.default_locale))
            .ok_or_else(|| L10nError::MissingTranslation {
                key: key.to_string(),
                locale: locale.to_string(),
            })?;
        format_template(template, args)
    }

    /// Renders a [`Message`] for one recipient locale.
    pub fn render(&self, locale: &Locale, message: &Message) -> Result<String, L10nError> {
        match message {
            Message::Raw(text) => Ok(text.clone()),
            Message::Key { key, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.translate(locale, key, &args)
            }
        }
    }
}

/// Substitutes `%s` placeholders in order.
pub fn format_template(template: &str, args: &[&str]) -> Result<String, L10nError> {
    let mut out = String::with_capacity(template.len());
    let mut next = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                let arg = args.get(next).ok_or_else(|| L10nError::MissingArgument {
                    template: template.to_string(),
                    index: next,
                    supplied: args.len(),
                })?;
                out.push_str(arg);
                next += 1;
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }

    Ok(out)
}

const ENGLISH: &[(&str, &str)] = &[
    ("AMBIG_EXIT", "Be more specific. Which way?"),
    ("MOVE_COMBAT", "You are in the middle of a fight! Try fleeing."),
    ("LOCKED", "The door to %s is locked."),
    ("OTHER_LOCKED", "%s tries the door to %s, but it is locked."),
    ("UNLOCKED", "You unlock the door with the %s."),
    ("OTHER_UNLOCKED", "%s unlocks the door with the %s."),
    ("LIMBO", "You are lost in limbo. There is nothing here."),
    ("LEAVE", "%s leaves."),
    ("NO_ENERGY", "You are too exhausted to go any further."),
    ("NO_EXIT", "You don't see an exit like that here."),
    ("NO_DOOR", "There is no door to the %s."),
    ("DOOR_OPENED", "You open the door to the %s."),
    ("OTHER_DOOR_OPENED", "%s opens the door to the %s."),
    ("DOOR_CLOSED", "You close the door to the %s."),
    ("OTHER_DOOR_CLOSED", "%s closes the door to the %s."),
    ("DOOR_ALREADY_OPEN", "The door to the %s is already open."),
    ("DOOR_ALREADY_CLOSED", "The door to the %s is already closed."),
    ("DOOR_IS_LOCKED", "The door to the %s is locked."),
    ("LOOK_NOWHERE", "You are floating in nothingness."),
    ("LOOK_EXITS", "[Exits: %s]"),
    ("LOOK_NO_EXITS", "[Exits: none]"),
    ("LOOK_HERE", "%s is here."),
    ("UNKNOWN_COMMAND", "That is not a valid command."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_template_in_order() {
        let out = format_template("%s tries the door to %s.", &["Ann", "the Vault"]).unwrap();
        assert_eq!(out, "Ann tries the door to the Vault.");
    }

    #[test]
    fn test_format_template_escapes_percent() {
        assert_eq!(format_template("100%% sure", &[]).unwrap(), "100% sure");
        assert_eq!(format_template("50% off", &[]).unwrap(), "50% off");
    }

    #[test]
    fn test_format_template_missing_argument() {
        let err = format_template("%s and %s", &["one"]).unwrap_err();
        assert!(matches!(err, L10nError::MissingArgument { index: 1, supplied: 1, .. }));
    }

    #[test]
    fn test_translate_falls_back_to_default_locale() {
        let catalog = MessageCatalog::new(Locale::new("en"))
            .with("LEAVE", "en", "%s leaves.")
            .with("LEAVE", "es", "%s se va.");
        assert_eq!(
            catalog.translate(&Locale::new("es"), "LEAVE", &["Ana"]).unwrap(),
            "Ana se va."
        );
        assert_eq!(
            catalog.translate(&Locale::new("de"), "LEAVE", &["Ana"]).unwrap(),
            "Ana leaves."
        );
    }

    #[test]
    fn test_translate_unknown_key() {
        let catalog = MessageCatalog::english_defaults();
        assert!(matches!(
            catalog.translate(&Locale::default(), "NOPE", &[]),
            Err(L10nError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = MessageCatalog::from_json(
            r#"{ "default_locale": "es", "messages": { "LIMBO": { "es": "Perdido." } } }"#,
        )
        .unwrap();
        assert_eq!(catalog.default_locale().as_str(), "es");
        assert_eq!(
            catalog.translate(&Locale::new("en"), "LIMBO", &[]).unwrap(),
            "Perdido."
        );
    }

    #[test]
    fn test_render_raw_message_is_verbatim() {
        let catalog = MessageCatalog::english_defaults();
        let text = catalog
            .render(&Locale::default(), &Message::raw("Ann enters."))
            .unwrap();
        assert_eq!(text, "Ann enters.");
    }

    #[test]
    fn test_merge_keeps_untouched_locales() {
        let mut catalog = MessageCatalog::english_defaults();
        catalog.merge(MessageCatalog::new(Locale::new("es")).with("LEAVE", "es", "%s se va."));
        assert_eq!(
            catalog.translate(&Locale::new("es"), "LEAVE", &["Ana"]).unwrap(),
            "Ana se va."
        );
        assert_eq!(
            catalog.translate(&Locale::new("en"), "LEAVE", &["Ann"]).unwrap(),
            "Ann leaves."
        );
        assert_eq!(catalog.default_locale().as_str(), "en");
    }
}

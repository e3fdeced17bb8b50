//! Composable localizable messages.
//!
//! A [`Message`] is either a [`Leaf`] (an id plus positional arguments) or a
//! [`Composite`] that joins child messages with optional decorations.

use std::fmt;

use nested_i18n_core::{FALLBACK, Lang};

use crate::error::{I18nError, I18nResult};
use crate::formatter::{Formatter, OnMiss, Walk};

/// A positional argument for `<args[N]>` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Message(Message),
}

impl Arg {
    /// Plain textual form; `None` for [`Arg::Null`] and for messages, which
    /// need a formatter.
    pub(crate) fn to_text(&self) -> Option<String> {
        match self {
            Arg::Null | Arg::Message(_) => None,
            Arg::Text(value) => Some(value.clone()),
            Arg::Int(value) => Some(value.to_string()),
            Arg::Float(value) => Some(value.to_string()),
            Arg::Bool(value) => Some(value.to_string()),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<Message> for Arg {
    fn from(value: Message) -> Self {
        Arg::Message(value)
    }
}

impl From<Leaf> for Arg {
    fn from(value: Leaf) -> Self {
        Arg::Message(value.into())
    }
}

impl From<Composite> for Arg {
    fn from(value: Composite) -> Self {
        Arg::Message(value.into())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

/// A single message id with its arguments. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    id: String,
    args: Vec<Arg>,
}

impl Leaf {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(id: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            id: id.into(),
            args,
        }
    }

    /// Appends the next positional argument.
    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

/// Content of one composite decoration slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Decoration {
    #[default]
    Empty,
    Text(String),
    Message(Box<Message>),
}

impl From<&str> for Decoration {
    fn from(value: &str) -> Self {
        Decoration::Text(value.to_string())
    }
}

impl From<String> for Decoration {
    fn from(value: String) -> Self {
        Decoration::Text(value)
    }
}

impl From<Message> for Decoration {
    fn from(value: Message) -> Self {
        Decoration::Message(Box::new(value))
    }
}

impl From<Leaf> for Decoration {
    fn from(value: Leaf) -> Self {
        Message::from(value).into()
    }
}

impl From<Composite> for Decoration {
    fn from(value: Composite) -> Self {
        Message::from(value).into()
    }
}

/// Ordered children joined as
/// `first + (before + child + after) [separator ...] + last`.
///
/// Each slot holds text, a nested message, or nothing; setting a slot
/// replaces whatever it held. Children are fixed at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    children: Vec<Message>,
    first: Decoration,
    last: Decoration,
    separator: Decoration,
    before: Decoration,
    after: Decoration,
}

impl Composite {
    pub fn of<I, M>(children: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Message>,
    {
        Self {
            children: children.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn children(&self) -> &[Message] {
        &self.children
    }

    pub fn first(&self) -> &Decoration {
        &self.first
    }

    pub fn last(&self) -> &Decoration {
        &self.last
    }

    pub fn separator(&self) -> &Decoration {
        &self.separator
    }

    pub fn before(&self) -> &Decoration {
        &self.before
    }

    pub fn after(&self) -> &Decoration {
        &self.after
    }

    pub fn set_first(&mut self, value: impl Into<Decoration>) -> &mut Self {
        self.first = value.into();
        self
    }

    pub fn set_last(&mut self, value: impl Into<Decoration>) -> &mut Self {
        self.last = value.into();
        self
    }

    pub fn set_separator(&mut self, value: impl Into<Decoration>) -> &mut Self {
        self.separator = value.into();
        self
    }

    pub fn set_before(&mut self, value: impl Into<Decoration>) -> &mut Self {
        self.before = value.into();
        self
    }

    pub fn set_after(&mut self, value: impl Into<Decoration>) -> &mut Self {
        self.after = value.into();
        self
    }

    pub fn with_first(mut self, value: impl Into<Decoration>) -> Self {
        self.set_first(value);
        self
    }

    pub fn with_last(mut self, value: impl Into<Decoration>) -> Self {
        self.set_last(value);
        self
    }

    pub fn with_separator(mut self, value: impl Into<Decoration>) -> Self {
        self.set_separator(value);
        self
    }

    pub fn with_before(mut self, value: impl Into<Decoration>) -> Self {
        self.set_before(value);
        self
    }

    pub fn with_after(mut self, value: impl Into<Decoration>) -> Self {
        self.set_after(value);
        self
    }

    fn render(
        &self,
        formatter: &Formatter,
        langs: &[Lang],
        walk: &mut Walk,
        depth: usize,
    ) -> I18nResult<Option<String>> {
        let Some(mut output) = self.first.render(formatter, langs, walk, depth)? else {
            return Ok(None);
        };
        // Resolved once and reused between every pair of children.
        let separator = if self.children.len() > 1 {
            match self.separator.render(formatter, langs, walk, depth)? {
                Some(separator) => separator,
                None => return Ok(None),
            }
        } else {
            String::new()
        };

        for (idx, child) in self.children.iter().enumerate() {
            if idx > 0 {
                output.push_str(&separator);
            }
            let (Some(before), Some(text), Some(after)) = (
                self.before.render(formatter, langs, walk, depth)?,
                child.render(formatter, langs, walk, depth)?,
                self.after.render(formatter, langs, walk, depth)?,
            ) else {
                return Ok(None);
            };
            output.push_str(&before);
            output.push_str(&text);
            output.push_str(&after);
        }

        let Some(last) = self.last.render(formatter, langs, walk, depth)? else {
            return Ok(None);
        };
        output.push_str(&last);
        Ok(Some(output))
    }
}

impl Decoration {
    fn render(
        &self,
        formatter: &Formatter,
        langs: &[Lang],
        walk: &mut Walk,
        depth: usize,
    ) -> I18nResult<Option<String>> {
        match self {
            Decoration::Empty => Ok(Some(String::new())),
            Decoration::Text(text) => Ok(Some(text.clone())),
            Decoration::Message(message) => message.render(formatter, langs, walk, depth),
        }
    }
}

/// A localizable message tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Leaf(Leaf),
    Composite(Composite),
}

impl From<Leaf> for Message {
    fn from(value: Leaf) -> Self {
        Message::Leaf(value)
    }
}

impl From<Composite> for Message {
    fn from(value: Composite) -> Self {
        Message::Composite(value)
    }
}

impl Message {
    /// Resolves against `langs`, returning `None` if any piece is missing.
    pub fn build(&self, formatter: &Formatter, langs: &[Lang]) -> Option<String> {
        self.render(formatter, langs, &mut Walk::new(OnMiss::Absent), 0)
            .ok()
            .flatten()
    }

    /// Resolves against `langs`, failing at the first missing piece.
    pub fn build_required(&self, formatter: &Formatter, langs: &[Lang]) -> I18nResult<String> {
        self.render(formatter, langs, &mut Walk::new(OnMiss::Raise), 0)?
            .ok_or_else(|| I18nError::message_not_found(langs, self))
    }

    pub fn build_by_fallback(&self, formatter: &Formatter) -> Option<String> {
        self.build(formatter, &[FALLBACK])
    }

    pub fn build_required_by_fallback(&self, formatter: &Formatter) -> I18nResult<String> {
        self.build_required(formatter, &[FALLBACK])
    }

    /// Like [`build`](Self::build) with the fallback language tried last.
    pub fn build_with_fallback(&self, formatter: &Formatter, langs: &[Lang]) -> Option<String> {
        self.build(formatter, &with_fallback(langs))
    }

    pub fn build_required_with_fallback(
        &self,
        formatter: &Formatter,
        langs: &[Lang],
    ) -> I18nResult<String> {
        self.build_required(formatter, &with_fallback(langs))
    }

    pub(crate) fn render(
        &self,
        formatter: &Formatter,
        langs: &[Lang],
        walk: &mut Walk,
        depth: usize,
    ) -> I18nResult<Option<String>> {
        match self {
            Message::Leaf(leaf) => formatter.render(&leaf.id, langs, &leaf.args, walk, depth),
            Message::Composite(composite) => composite.render(formatter, langs, walk, depth),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Leaf(leaf) => write!(f, "{}", leaf.id),
            Message::Composite(composite) => {
                f.write_str("[")?;
                for (idx, child) in composite.children.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]")
            }
        }
    }
}

pub(crate) fn with_fallback(langs: &[Lang]) -> Vec<Lang> {
    let mut extended = Vec::with_capacity(langs.len() + 1);
    extended.extend_from_slice(langs);
    extended.push(FALLBACK);
    extended
}

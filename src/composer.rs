//! Comment composer: an editable rich-text buffer with atomic mention tokens.
//!
//! [`RichText`] keeps plain text plus byte-range annotations: mention tokens
//! and formatting marks. Every edit returns a new buffer and leaves the old
//! one untouched, so a failed edit never half-applies. [`Composer`] wraps a
//! buffer with a cursor, the pending pin and the captured video timestamp.
//!
//! Mention tokens are atomic. Backspace directly after a token removes the
//! whole token, and any edit that lands strictly inside one is refused.

#[cfg(test)]
#[path = "composer_test.rs"]
mod composer_test;

use std::ops::Range;

use crate::comment::UserId;
use crate::mention::{self, Member};
use crate::surface::{PinPosition, Point, Surface};

/// Link schemes a comment may carry.
const LINK_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposerError {
    #[error("range {start}..{end} is outside the text")]
    InvalidRange { start: usize, end: usize },
    #[error("cannot edit inside a mention")]
    InsideMention,
    #[error("unsupported link: {0}")]
    UnsupportedLink(String),
    #[error("no mention is being typed at the cursor")]
    NoActiveMention,
}

/// Inline or block formatting applied to a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Link(String),
    /// Bullet list; always spans whole lines.
    List,
}

impl Mark {
    fn same_kind(&self, other: &Mark) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSpan {
    pub range: Range<usize>,
    pub mark: Mark,
}

/// An inserted `@Display Name` reference to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionToken {
    pub range: Range<usize>,
    pub user_id: UserId,
    pub display_name: String,
}

// =============================================================================
// RichText
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    text: String,
    mentions: Vec<MentionToken>,
    marks: Vec<MarkSpan>,
}

impl RichText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn mentions(&self) -> &[MentionToken] {
        &self.mentions
    }

    #[must_use]
    pub fn marks(&self) -> &[MarkSpan] {
        &self.marks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when there is nothing but whitespace to submit.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    // --- Editing ---

    /// Insert `s` at byte offset `at`.
    ///
    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] if `at` is not a char boundary, and
    /// [`ComposerError::InsideMention`] if it falls inside a mention token.
    pub fn insert_text(&self, at: usize, s: &str) -> Result<RichText, ComposerError> {
        self.check_offset(at)?;
        if self.mention_around(at).is_some() {
            return Err(ComposerError::InsideMention);
        }
        let n = s.len();
        let mut out = self.clone();
        out.text.insert_str(at, s);
        for m in &mut out.mentions {
            if m.range.start >= at {
                m.range = m.range.start + n..m.range.end + n;
            }
        }
        for span in &mut out.marks {
            // A list item keeps its line start, so it grows instead of moving.
            let grows_at_start = span.mark == Mark::List && span.range.start == at;
            if span.range.start >= at && !grows_at_start {
                span.range = span.range.start + n..span.range.end + n;
            } else if span.range.end >= at {
                span.range.end += n;
            }
        }
        Ok(out)
    }

    /// Remove `range`. A mention token that overlaps the range is removed
    /// whole.
    ///
    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] if the range is reversed, out of
    /// bounds or splits a character.
    pub fn delete(&self, range: Range<usize>) -> Result<RichText, ComposerError> {
        self.check_range(&range)?;
        let range = self
            .mentions
            .iter()
            .filter(|m| overlaps(&m.range, &range))
            .fold(range.clone(), |acc, m| acc.start.min(m.range.start)..acc.end.max(m.range.end));
        if range.is_empty() {
            return Ok(self.clone());
        }

        let mut out = self.clone();
        out.text.replace_range(range.clone(), "");
        out.mentions.retain(|m| !overlaps(&m.range, &range));
        for m in &mut out.mentions {
            m.range = shift_after_delete(&m.range, &range);
        }
        for span in &mut out.marks {
            span.range = shift_after_delete(&span.range, &range);
        }
        out.marks.retain(|s| !s.range.is_empty());
        Ok(out)
    }

    /// Delete backward from `cursor`; returns the buffer and the new cursor.
    ///
    /// Directly after a mention token the whole token goes.
    ///
    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] for a bad offset, and
    /// [`ComposerError::InsideMention`] when the cursor sits inside a token.
    pub fn backspace(&self, cursor: usize) -> Result<(RichText, usize), ComposerError> {
        self.check_offset(cursor)?;
        if let Some(token) = self.mentions.iter().find(|m| m.range.end == cursor) {
            let start = token.range.start;
            return Ok((self.delete(token.range.clone())?, start));
        }
        if self.mention_around(cursor).is_some() {
            return Err(ComposerError::InsideMention);
        }
        match self.text[..cursor].char_indices().next_back() {
            Some((prev, _)) => Ok((self.delete(prev..cursor)?, prev)),
            None => Ok((self.clone(), 0)),
        }
    }

    // --- Mentions ---

    /// Offset of the `@` opening a mention being typed at `cursor`. The `@`
    /// of an already inserted token never counts.
    #[must_use]
    pub fn active_mention_start(&self, cursor: usize) -> Option<usize> {
        let at = mention::mention_trigger(&self.text, cursor)?;
        if self.mentions.iter().any(|m| m.range.contains(&at)) {
            return None;
        }
        Some(at)
    }

    #[must_use]
    pub fn active_mention_query(&self, cursor: usize) -> Option<&str> {
        let at = self.active_mention_start(cursor)?;
        self.text.get(at + 1..cursor)
    }

    /// Replace the `@query` ending at `cursor` with an atomic token for
    /// `member` followed by one space. Returns the buffer and the cursor
    /// placed after that space.
    ///
    /// # Errors
    ///
    /// [`ComposerError::NoActiveMention`] when no `@query` ends at `cursor`.
    pub fn insert_mention(&self, cursor: usize, member: &Member) -> Result<(RichText, usize), ComposerError> {
        let at = self.active_mention_start(cursor).ok_or(ComposerError::NoActiveMention)?;
        let label = format!("@{}", member.display_name);
        let mut out = self.delete(at..cursor)?.insert_text(at, &format!("{label} "))?;
        out.mentions.push(MentionToken {
            range: at..at + label.len(),
            user_id: member.id,
            display_name: member.display_name.clone(),
        });
        out.mentions.sort_by_key(|m| m.range.start);
        Ok((out, at + label.len() + 1))
    }

    // --- Formatting ---

    /// Toggle bold over `range`.
    ///
    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] for an empty or invalid range.
    pub fn apply_bold(&self, range: Range<usize>) -> Result<RichText, ComposerError> {
        self.toggle(range, Mark::Bold)
    }

    /// Toggle italic over `range`.
    ///
    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] for an empty or invalid range.
    pub fn apply_italic(&self, range: Range<usize>) -> Result<RichText, ComposerError> {
        self.toggle(range, Mark::Italic)
    }

    /// Toggle a bullet list over every line touched by `range`. An empty
    /// range selects the line containing it.
    ///
    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] for an invalid range or an empty line
    /// at the end of the text.
    pub fn apply_list(&self, range: Range<usize>) -> Result<RichText, ComposerError> {
        self.check_range(&range)?;
        let lines = self.line_span(&range);
        self.toggle(lines, Mark::List)
    }

    /// Link `range` to `url`, replacing any link already there.
    ///
    /// # Errors
    ///
    /// [`ComposerError::UnsupportedLink`] unless `url` is http, https or
    /// mailto; [`ComposerError::InvalidRange`] for an empty or invalid range.
    pub fn apply_link(&self, range: Range<usize>, url: &str) -> Result<RichText, ComposerError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Err(ComposerError::InvalidRange { start: range.start, end: range.end });
        }
        let url = url.trim();
        if !is_allowed_link(url) {
            return Err(ComposerError::UnsupportedLink(url.to_string()));
        }
        let mut out = self.clone();
        out.clear_marks(&range, &Mark::Link(String::new()));
        out.marks.push(MarkSpan { range, mark: Mark::Link(url.to_string()) });
        out.normalize_marks();
        Ok(out)
    }

    /// Remove any link over `range`.
    ///
    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] for an invalid range.
    pub fn remove_link(&self, range: Range<usize>) -> Result<RichText, ComposerError> {
        self.check_range(&range)?;
        let mut out = self.clone();
        out.clear_marks(&range, &Mark::Link(String::new()));
        Ok(out)
    }

    fn toggle(&self, range: Range<usize>, mark: Mark) -> Result<RichText, ComposerError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Err(ComposerError::InvalidRange { start: range.start, end: range.end });
        }
        let covered = self.is_covered(&range, &mark);
        let mut out = self.clone();
        out.clear_marks(&range, &mark);
        if !covered {
            out.marks.push(MarkSpan { range, mark });
        }
        out.normalize_marks();
        Ok(out)
    }

    fn is_covered(&self, range: &Range<usize>, mark: &Mark) -> bool {
        let mut spans: Vec<&Range<usize>> =
            self.marks.iter().filter(|s| s.mark == *mark).map(|s| &s.range).collect();
        spans.sort_by_key(|r| r.start);
        let mut reach = range.start;
        for r in spans {
            if r.start > reach {
                break;
            }
            reach = reach.max(r.end);
        }
        reach >= range.end
    }

    /// Cut every mark of `mark`'s kind out of `range`, keeping the parts
    /// outside it.
    fn clear_marks(&mut self, range: &Range<usize>, mark: &Mark) {
        let mut kept = Vec::with_capacity(self.marks.len());
        for span in self.marks.drain(..) {
            if !span.mark.same_kind(mark) || !overlaps(&span.range, range) {
                kept.push(span);
                continue;
            }
            if span.range.start < range.start {
                kept.push(MarkSpan { range: span.range.start..range.start, mark: span.mark.clone() });
            }
            if span.range.end > range.end {
                kept.push(MarkSpan { range: range.end..span.range.end, mark: span.mark });
            }
        }
        self.marks = kept;
    }

    /// Merge touching or overlapping spans of the same mark.
    fn normalize_marks(&mut self) {
        self.marks.sort_by_key(|s| s.range.start);
        let mut merged: Vec<MarkSpan> = Vec::with_capacity(self.marks.len());
        for span in self.marks.drain(..) {
            if let Some(prev) = merged.iter_mut().rev().find(|p| p.mark == span.mark)
                && prev.range.end >= span.range.start
            {
                prev.range.end = prev.range.end.max(span.range.end);
                continue;
            }
            merged.push(span);
        }
        self.marks = merged;
    }

    /// Whole lines touched by `range`, including their trailing newline.
    fn line_span(&self, range: &Range<usize>) -> Range<usize> {
        let start = self.text[..range.start].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[range.end..].find('\n').map_or(self.text.len(), |i| range.end + i + 1);
        start..end
    }

    // --- Validation ---

    fn check_offset(&self, at: usize) -> Result<(), ComposerError> {
        if self.text.is_char_boundary(at) {
            Ok(())
        } else {
            Err(ComposerError::InvalidRange { start: at, end: at })
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), ComposerError> {
        if range.start <= range.end && self.text.is_char_boundary(range.start) && self.text.is_char_boundary(range.end) {
            Ok(())
        } else {
            Err(ComposerError::InvalidRange { start: range.start, end: range.end })
        }
    }

    /// The token `at` falls strictly inside.
    fn mention_around(&self, at: usize) -> Option<&MentionToken> {
        self.mentions.iter().find(|m| m.range.start < at && at < m.range.end)
    }

    // --- Output ---

    /// Sanitized HTML for storage. All text is escaped; the only tags are
    /// `p`, `br`, `ul`, `li`, `strong`, `em`, `a` and mention `span`s.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut paragraph: Vec<String> = Vec::new();
        let mut list: Vec<String> = Vec::new();

        let mut line_start = 0;
        for line in self.text.split('\n') {
            let range = line_start..line_start + line.len();
            let mut rendered = String::new();
            self.render_inline(range, &mut rendered);

            if self.is_list_line(line_start) {
                flush_paragraph(&mut paragraph, &mut out);
                list.push(rendered);
            } else {
                flush_list(&mut list, &mut out);
                paragraph.push(rendered);
            }
            line_start += line.len() + 1;
        }
        flush_paragraph(&mut paragraph, &mut out);
        flush_list(&mut list, &mut out);
        out
    }

    fn is_list_line(&self, line_start: usize) -> bool {
        self.marks
            .iter()
            .any(|s| s.mark == Mark::List && s.range.start <= line_start && line_start < s.range.end)
    }

    fn render_inline(&self, range: Range<usize>, out: &mut String) {
        let mut pos = range.start;
        while pos < range.end {
            if let Some(token) = self.mentions.iter().find(|m| m.range.start == pos) {
                let label = escape_html(&self.text[token.range.clone()]);
                let inner = format!("<span class=\"mention\" data-mention-id=\"{}\">{label}</span>", token.user_id);
                self.wrap_marks(pos, &inner, out);
                pos = token.range.end;
                continue;
            }
            let next = self
                .marks
                .iter()
                .flat_map(|s| [s.range.start, s.range.end])
                .chain(self.mentions.iter().map(|m| m.range.start))
                .filter(|&b| b > pos && b < range.end)
                .min()
                .unwrap_or(range.end);
            self.wrap_marks(pos, &escape_html(&self.text[pos..next]), out);
            pos = next;
        }
    }

    fn wrap_marks(&self, at: usize, inner: &str, out: &mut String) {
        let active = |mark: &Mark| self.marks.iter().any(|s| s.mark == *mark && s.range.contains(&at));
        let link = self.marks.iter().rev().find_map(|s| match &s.mark {
            Mark::Link(url) if s.range.contains(&at) => Some(url.as_str()),
            _ => None,
        });
        let bold = active(&Mark::Bold);
        let italic = active(&Mark::Italic);

        if let Some(url) = link {
            out.push_str(&format!("<a href=\"{}\" rel=\"noopener noreferrer\">", escape_html(url)));
        }
        if bold {
            out.push_str("<strong>");
        }
        if italic {
            out.push_str("<em>");
        }
        out.push_str(inner);
        if italic {
            out.push_str("</em>");
        }
        if bold {
            out.push_str("</strong>");
        }
        if link.is_some() {
            out.push_str("</a>");
        }
    }
}

fn flush_paragraph(lines: &mut Vec<String>, out: &mut String) {
    if lines.iter().all(String::is_empty) {
        lines.clear();
        return;
    }
    out.push_str("<p>");
    out.push_str(&lines.join("<br>"));
    out.push_str("</p>");
    lines.clear();
}

fn flush_list(items: &mut Vec<String>, out: &mut String) {
    if items.is_empty() {
        return;
    }
    out.push_str("<ul>");
    for item in items.drain(..) {
        out.push_str("<li>");
        out.push_str(&item);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn shift_after_delete(r: &Range<usize>, cut: &Range<usize>) -> Range<usize> {
    let map = |p: usize| {
        if p <= cut.start {
            p
        } else if p >= cut.end {
            p - cut.len()
        } else {
            cut.start
        }
    };
    map(r.start)..map(r.end)
}

fn is_allowed_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    LINK_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

// =============================================================================
// HTML helpers
// =============================================================================

#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Text content of stored comment HTML: tags dropped, block breaks turned
/// into newlines, entities decoded, surrounding whitespace trimmed.
#[must_use]
pub fn plain_text(html: &str) -> String {
    let mut stripped = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        stripped.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            stripped.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
        let name = tag.split(|c: char| c.is_whitespace() || c == '/').find(|s| !s.is_empty()).unwrap_or("");
        let closing = tag.starts_with('/');
        if name == "br" || (closing && matches!(name, "p" | "li")) {
            stripped.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    stripped.push_str(rest);
    decode_entities(&stripped).trim().to_string()
}

fn decode_entities(s: &str) -> String {
    const ENTITIES: [(&str, char); 6] =
        [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"'), ("&#39;", '\''), ("&nbsp;", ' ')];
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// =============================================================================
// Composer
// =============================================================================

/// Draft state for a new comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composer {
    buffer: RichText,
    cursor: usize,
    pin: Option<PinPosition>,
    video_timestamp: Option<f64>,
}

impl Composer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn buffer(&self) -> &RichText {
        &self.buffer
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.buffer.is_blank()
    }

    /// # Errors
    ///
    /// [`ComposerError::InvalidRange`] off a char boundary, and
    /// [`ComposerError::InsideMention`] inside a token.
    pub fn set_cursor(&mut self, at: usize) -> Result<(), ComposerError> {
        self.buffer.check_offset(at)?;
        if self.buffer.mention_around(at).is_some() {
            return Err(ComposerError::InsideMention);
        }
        self.cursor = at;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RichText::insert_text`].
    pub fn type_text(&mut self, s: &str) -> Result<(), ComposerError> {
        self.buffer = self.buffer.insert_text(self.cursor, s)?;
        self.cursor += s.len();
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RichText::backspace`].
    pub fn backspace(&mut self) -> Result<(), ComposerError> {
        let (buffer, cursor) = self.buffer.backspace(self.cursor)?;
        self.buffer = buffer;
        self.cursor = cursor;
        Ok(())
    }

    /// The mention query being typed, if any.
    #[must_use]
    pub fn mention_query(&self) -> Option<&str> {
        self.buffer.active_mention_query(self.cursor)
    }

    /// Members matching the mention being typed; empty when none is.
    #[must_use]
    pub fn mention_candidates<'a>(&self, members: &'a [Member]) -> Vec<&'a Member> {
        match self.mention_query() {
            Some(query) => mention::filter_members(members, query),
            None => Vec::new(),
        }
    }

    /// # Errors
    ///
    /// See [`RichText::insert_mention`].
    pub fn choose_mention(&mut self, member: &Member) -> Result<(), ComposerError> {
        let (buffer, cursor) = self.buffer.insert_mention(self.cursor, member)?;
        self.buffer = buffer;
        self.cursor = cursor;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RichText::apply_bold`].
    pub fn bold(&mut self, range: Range<usize>) -> Result<(), ComposerError> {
        self.buffer = self.buffer.apply_bold(range)?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RichText::apply_italic`].
    pub fn italic(&mut self, range: Range<usize>) -> Result<(), ComposerError> {
        self.buffer = self.buffer.apply_italic(range)?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RichText::apply_list`].
    pub fn list(&mut self, range: Range<usize>) -> Result<(), ComposerError> {
        self.buffer = self.buffer.apply_list(range)?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RichText::apply_link`].
    pub fn link(&mut self, range: Range<usize>, url: &str) -> Result<(), ComposerError> {
        self.buffer = self.buffer.apply_link(range, url)?;
        Ok(())
    }

    // --- Pin and timestamp ---

    #[must_use]
    pub fn pin(&self) -> Option<PinPosition> {
        self.pin
    }

    /// Drop a pin at surface pixel `at`. Replaces any earlier pin; returns
    /// `None` and leaves the pin alone while the surface has no size.
    pub fn place_pin(&mut self, surface: &Surface, at: Point) -> Option<PinPosition> {
        let pos = surface.to_percent(at)?;
        self.pin = Some(pos);
        Some(pos)
    }

    pub fn clear_pin(&mut self) {
        self.pin = None;
    }

    #[must_use]
    pub fn video_timestamp(&self) -> Option<f64> {
        self.video_timestamp
    }

    /// Capture the playback position the comment refers to.
    pub fn set_video_timestamp(&mut self, secs: Option<f64>) {
        self.video_timestamp = secs.filter(|s| s.is_finite() && *s >= 0.0);
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.buffer.to_html()
    }

    /// Back to an empty draft with no pin or timestamp.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

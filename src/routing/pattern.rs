//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Split a path template into literal and `:param` segments
//! - Reject templates that declare the same parameter twice
//! - Match a concrete path and bind captured values by position
//!
//! # Design Decisions
//! - No regex: literal segments are compared as plain strings, so characters
//!   such as `.` or `+` in a template never change matching behavior
//! - A path matches only when its segment count equals the template's
//! - Parameter segments match any non-empty segment (never `/`, since `/`
//!   is the separator)

use std::collections::BTreeMap;

use thiserror::Error;

/// Parameters extracted from a matched path, keyed by name.
pub type Params = BTreeMap<String, String>;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The same `:name` appears more than once in one pattern.
    #[error("duplicate parameter `{param}` in route pattern `{pattern}`")]
    DuplicateParam { pattern: String, param: String },
}

/// One compiled segment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Captures a non-empty path segment.
    Param(String),
}

/// A route pattern compiled into an ordered segment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compile `pattern` under `base`.
    ///
    /// The base is treated as a literal prefix even if it contains `:`.
    pub fn compile(base: &str, pattern: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut param_names: Vec<String> = Vec::new();

        // Base and pattern are joined textually, so "/shop" + "/" is "/shop/".
        let base_segments = base.split('/').map(|s| Segment::Literal(s.to_string()));
        let mut base_segments: Vec<Segment> = base_segments.collect();
        if !base.is_empty() {
            // The last base segment is glued to the first pattern segment.
            let glue = match base_segments.pop() {
                Some(Segment::Literal(s)) => s,
                _ => String::new(),
            };
            segments.extend(base_segments);
            let mut pattern_parts = pattern.split('/');
            let first = pattern_parts.next().unwrap_or_default();
            segments.push(Segment::Literal(format!("{glue}{first}")));
            for part in pattern_parts {
                segments.push(Self::compile_segment(pattern, part, &mut param_names)?);
            }
        } else {
            for part in pattern.split('/') {
                segments.push(Self::compile_segment(pattern, part, &mut param_names)?);
            }
        }

        Ok(Self {
            segments,
            param_names,
        })
    }

    fn compile_segment(
        pattern: &str,
        part: &str,
        param_names: &mut Vec<String>,
    ) -> Result<Segment, PatternError> {
        match part.strip_prefix(':') {
            Some(name) if !name.is_empty() => {
                if param_names.iter().any(|n| n == name) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        param: name.to_string(),
                    });
                }
                param_names.push(name.to_string());
                Ok(Segment::Param(name.to_string()))
            }
            _ => Ok(Segment::Literal(part.to_string())),
        }
    }

    /// Declared parameter names, in pattern order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Test `path` against the pattern, returning captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut parts = path.split('/');

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        // Anchored at the end: leftover segments mean a longer path.
        if parts.next().is_some() {
            return None;
        }

        Some(params)
    }
}

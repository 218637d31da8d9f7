//! Route parameter patterns.
//!
//! A route may declare trailing parameters in the `/:name` form, with a
//! trailing `?` marking the segment optional (e.g. `/:action?`). Each step
//! is mounted once per concrete URL shape the pattern allows, translated to
//! the router's `{name}` capture syntax.

/// One `/:name` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSegment {
    pub name: String,
    pub optional: bool,
}

/// Parsed parameter pattern. The default pattern has no segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamPattern {
    segments: Vec<ParamSegment>,
}

impl ParamPattern {
    /// Parse a pattern such as `/:action?` or `/:id/:action?`.
    ///
    /// Optional segments may only be followed by optional segments.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let rest = trimmed
            .strip_prefix('/')
            .ok_or_else(|| "pattern must start with '/'".to_string())?;

        let mut segments: Vec<ParamSegment> = Vec::new();
        for part in rest.split('/') {
            let name = part
                .strip_prefix(':')
                .ok_or_else(|| format!("segment {:?} must start with ':'", part))?;
            let (name, optional) = match name.strip_suffix('?') {
                Some(name) => (name, true),
                None => (name, false),
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(format!("invalid parameter name {:?}", name));
            }
            if !optional && segments.last().is_some_and(|s| s.optional) {
                return Err(format!("required parameter {:?} follows an optional one", name));
            }
            if segments.iter().any(|s| s.name == name) {
                return Err(format!("parameter {:?} is declared twice", name));
            }
            segments.push(ParamSegment {
                name: name.to_string(),
                optional,
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[ParamSegment] {
        &self.segments
    }

    /// Every suffix the pattern matches, shortest first, in `{name}` form.
    pub fn suffixes(&self) -> Vec<String> {
        let required: String = self
            .segments
            .iter()
            .filter(|s| !s.optional)
            .map(|s| format!("/{{{}}}", s.name))
            .collect();

        let mut suffixes = vec![required.clone()];
        let mut current = required;
        for segment in self.segments.iter().filter(|s| s.optional) {
            current.push_str(&format!("/{{{}}}", segment.name));
            suffixes.push(current.clone());
        }
        suffixes
    }
}

/// Join a normalised base URL and a step path.
pub fn join_path(base_url: &str, step: &str) -> String {
    match (base_url.is_empty(), step == "/") {
        (true, _) => step.to_string(),
        (false, true) => base_url.to_string(),
        (false, false) => format!("{}{}", base_url, step),
    }
}

/// URLs a step is mounted at under `base_url` with `pattern` appended.
pub fn mount_paths(base_url: &str, step: &str, pattern: &ParamPattern) -> Vec<String> {
    let path = join_path(base_url, step);
    pattern
        .suffixes()
        .into_iter()
        .map(|suffix| {
            if suffix.is_empty() {
                path.clone()
            } else if path == "/" {
                suffix
            } else {
                format!("{}{}", path, suffix)
            }
        })
        .collect()
}

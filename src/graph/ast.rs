//! Typed model of an ffmpeg `-filter_complex` graph.
//!
//! Graph construction works on these values; the wire string only exists once
//! [`FilterGraph::to_filter_complex`] is called at the encoder boundary.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Elementary stream selector of an input pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
}

impl StreamKind {
    fn letter(self) -> char {
        match self {
            Self::Video => 'v',
            Self::Audio => 'a',
        }
    }
}

/// A filter pad: either a stream of an encoder input or a named intermediate link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pad {
    /// `[index:v]` / `[index:a]`.
    Input { index: usize, stream: StreamKind },
    /// `[label]`.
    Label(String),
}

impl Pad {
    pub fn video(index: usize) -> Self {
        Self::Input {
            index,
            stream: StreamKind::Video,
        }
    }

    pub fn audio(index: usize) -> Self {
        Self::Input {
            index,
            stream: StreamKind::Audio,
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }

    /// Argument for `-map`.
    pub fn map_arg(&self) -> String {
        match self {
            Self::Input { index, stream } => format!("{index}:{}", stream.letter()),
            Self::Label(name) => format!("[{name}]"),
        }
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input { index, stream } => write!(f, "[{index}:{}]", stream.letter()),
            Self::Label(name) => write!(f, "[{name}]"),
        }
    }
}

/// One filter argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterArg {
    /// Positional value: `v`.
    Value(String),
    /// Keyed value: `k=v`.
    Keyed(String, String),
    /// Positional expression, single-quoted: `'expr'`.
    Expr(String),
    /// Keyed expression, single-quoted: `k='expr'`.
    KeyedExpr(String, String),
}

impl fmt::Display for FilterArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(v),
            Self::Keyed(k, v) => write!(f, "{k}={v}"),
            Self::Expr(e) => write!(f, "'{e}'"),
            Self::KeyedExpr(k, e) => write!(f, "{k}='{e}'"),
        }
    }
}

/// A named filter with its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub args: Vec<FilterArg>,
}

impl Filter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn value(mut self, v: impl ToString) -> Self {
        self.args.push(FilterArg::Value(v.to_string()));
        self
    }

    pub fn kv(mut self, k: impl Into<String>, v: impl ToString) -> Self {
        self.args.push(FilterArg::Keyed(k.into(), v.to_string()));
        self
    }

    pub fn expr(mut self, e: impl Into<String>) -> Self {
        self.args.push(FilterArg::Expr(e.into()));
        self
    }

    pub fn kexpr(mut self, k: impl Into<String>, e: impl Into<String>) -> Self {
        self.args.push(FilterArg::KeyedExpr(k.into(), e.into()));
        self
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { ":" })?;
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

/// `[in]...filter,filter,...[out]...`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterChain {
    pub inputs: Vec<Pad>,
    pub filters: Vec<Filter>,
    pub outputs: Vec<Pad>,
}

impl FilterChain {
    pub fn new(inputs: Vec<Pad>, filters: Vec<Filter>, outputs: Vec<Pad>) -> Self {
        Self {
            inputs,
            filters,
            outputs,
        }
    }

    /// Single-input, single-output chain.
    pub fn simple(input: Pad, filters: Vec<Filter>, output: Pad) -> Self {
        Self::new(vec![input], filters, vec![output])
    }

    /// Source chain with no input pads.
    pub fn source(filters: Vec<Filter>, output: Pad) -> Self {
        Self::new(Vec::new(), filters, vec![output])
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pad in &self.inputs {
            write!(f, "{pad}")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        for pad in &self.outputs {
            write!(f, "{pad}")?;
        }
        Ok(())
    }
}

/// One encoder input: options placed before `-i`, then the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSpec {
    pub options: Vec<String>,
    pub path: PathBuf,
}

impl InputSpec {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            options: Vec::new(),
            path: path.into(),
        }
    }

    /// Still image looped indefinitely at `fps`.
    pub fn looped_image(path: impl Into<PathBuf>, fps: u32) -> Self {
        Self {
            options: vec![
                "-loop".to_string(),
                "1".to_string(),
                "-framerate".to_string(),
                fps.to_string(),
            ],
            path: path.into(),
        }
    }

    /// Encoder arguments for this input.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.options.iter().map(OsString::from).collect();
        args.push("-i".into());
        args.push(self.path.clone().into_os_string());
        args
    }
}

/// Complete graph handed to the encoder: ordered inputs, ordered chains, named outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterGraph {
    pub inputs: Vec<InputSpec>,
    pub chains: Vec<FilterChain>,
    pub video_out: Pad,
    pub audio_out: Pad,
}

impl FilterGraph {
    /// Serialize the chains in `-filter_complex` grammar.
    pub fn to_filter_complex(&self) -> String {
        self.chains
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Chains that produce `label`.
    pub fn producer_of(&self, label: &str) -> Option<&FilterChain> {
        let pad = Pad::label(label);
        self.chains.iter().find(|c| c.outputs.contains(&pad))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/ast.rs"]
mod tests;

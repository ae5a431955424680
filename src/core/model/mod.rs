use crate::core::error::IndexError;
use std::fmt;

/// Run identifier, already checked to be usable as a single path component.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn parse(s: &str) -> Result<Self, IndexError> {
        crate::core::runid::validate(s)?;
        Ok(RunId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn report_dir(&self) -> String {
        format!("report_{}", self.0)
    }

    pub fn basecall_stats_dir(&self) -> String {
        format!("basecall_stats_{}", self.0)
    }

    pub fn qc_dir(&self) -> String {
        format!("qc_{}", self.0)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Presence {
    pub hiseq: bool,
    pub hiseq_detailed: bool,
    pub demux: bool,
    pub qc: bool,
}

impl Presence {
    pub fn count(self) -> usize {
        [self.hiseq, self.demux, self.qc]
            .iter()
            .filter(|&&b| b)
            .count()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SectionKind {
    HiSeq,
    Demux,
    Qc,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [SectionKind::HiSeq, SectionKind::Demux, SectionKind::Qc];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::HiSeq => "HiSeq reports",
            SectionKind::Demux => "Demultiplexing reports",
            SectionKind::Qc => "Quality control reports",
        }
    }

    /// Name used on the command line and in template section markers.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::HiSeq => "hiseq",
            SectionKind::Demux => "demux",
            SectionKind::Qc => "qc",
        }
    }
}

/// One link of a section. `href` segments are kept apart so the run id part
/// can be encoded at render time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Link {
    pub label: &'static str,
    pub href: Href,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Href {
    pub segments: Vec<String>,
}

impl Href {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Href {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Relative filesystem path of the link target.
    pub fn raw(&self) -> String {
        self.segments.join("/")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexPage {
    pub run_id: RunId,
    pub sections: Vec<Section>,
}

impl IndexPage {
    pub fn link_count(&self) -> usize {
        self.sections.iter().map(|s| s.links.len()).sum()
    }
}

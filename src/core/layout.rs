use crate::core::error::IndexError;
use crate::core::model::{Href, IndexPage, Link, Presence, RunId, Section, SectionKind};
use crate::core::probe;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct LayoutOptions {
    /// Sections allowed on the page; a present category outside this set is skipped.
    pub sections: Vec<SectionKind>,
    /// Drop links whose target is missing under the base dir.
    pub prune_missing_links: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            sections: SectionKind::ALL.to_vec(),
            prune_missing_links: false,
        }
    }
}

impl LayoutOptions {
    fn enabled(&self, kind: SectionKind) -> bool {
        self.sections.contains(&kind)
    }
}

pub fn hiseq_links(run_id: &RunId, detailed: bool) -> Vec<Link> {
    let report = run_id.report_dir();
    let mut links = vec![Link {
        label: "First base report",
        href: Href::new([report.as_str(), "First_Base_Report.htm"]),
    }];
    if detailed {
        links.push(Link {
            label: "Run info",
            href: Href::new([report.as_str(), "Status.htm"]),
        });
        links.push(Link {
            label: "All reports (compressed archive)",
            href: Href::new([format!("{}.tar.bz2", report)]),
        });
    }
    // Log archive is listed whether or not the detailed reports exist.
    links.push(Link {
        label: "HiSeq log (compressed archive)",
        href: Href::new([format!("hiseq_log_{}.tar.bz2", run_id)]),
    });
    links
}

pub fn demux_links(run_id: &RunId) -> Vec<Link> {
    let dir = run_id.basecall_stats_dir();
    vec![
        Link {
            label: "All",
            href: Href::new([dir.as_str(), "All.htm"]),
        },
        Link {
            label: "IVC",
            href: Href::new([dir.as_str(), "IVC.htm"]),
        },
        Link {
            label: "Demultiplex stats",
            href: Href::new([dir.as_str(), "Demultiplex_Stats.htm"]),
        },
        Link {
            label: "All reports (compressed archive)",
            href: Href::new([format!("{}.tar.bz2", dir)]),
        },
    ]
}

pub fn qc_links(run_id: &RunId) -> Vec<Link> {
    vec![Link {
        label: "QC report",
        href: Href::new([run_id.qc_dir(), format!("{}.html", run_id)]),
    }]
}

/// Builds the page model from presence flags alone. No filesystem access.
pub fn build(run_id: &RunId, presence: Presence, opts: &LayoutOptions) -> IndexPage {
    let mut sections = Vec::with_capacity(3);
    if presence.hiseq && opts.enabled(SectionKind::HiSeq) {
        sections.push(Section {
            kind: SectionKind::HiSeq,
            links: hiseq_links(run_id, presence.hiseq_detailed),
        });
    }
    if presence.demux && opts.enabled(SectionKind::Demux) {
        sections.push(Section {
            kind: SectionKind::Demux,
            links: demux_links(run_id),
        });
    }
    if presence.qc && opts.enabled(SectionKind::Qc) {
        sections.push(Section {
            kind: SectionKind::Qc,
            links: qc_links(run_id),
        });
    }
    IndexPage {
        run_id: run_id.clone(),
        sections,
    }
}

/// Removes links whose target does not exist under `base_dir`, then any
/// section left empty.
pub fn prune_missing(page: &mut IndexPage, base_dir: &Path) -> Result<(), IndexError> {
    for section in &mut page.sections {
        let mut kept = Vec::with_capacity(section.links.len());
        for link in section.links.drain(..) {
            if probe::exists(&base_dir.join(link.href.raw()))? {
                kept.push(link);
            }
        }
        section.links = kept;
    }
    page.sections.retain(|s| !s.links.is_empty());
    Ok(())
}

pub fn build_for_dir(
    base_dir: &Path,
    run_id: &RunId,
    opts: &LayoutOptions,
) -> Result<(Presence, IndexPage), IndexError> {
    let presence = probe::probe(base_dir, run_id)?;
    let mut page = build(run_id, presence, opts);
    if opts.prune_missing_links {
        prune_missing(&mut page, base_dir)?;
    }
    Ok((presence, page))
}

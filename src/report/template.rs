//! Index templates: `<!--START_SECTION name-->` blocks kept per active
//! section, `${RUN_ID}`-style placeholders substituted on every line.

use crate::core::error::IndexError;
use crate::core::model::{IndexPage, Presence, SectionKind};
use crate::core::probe;
use crate::report::html::{self, decode_href, encode_segment, escape_html};
use aho_corasick::AhoCorasick;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const START_MARKER: &str = "<!--START_SECTION";
const END_MARKER: &str = "<!--END_SECTION";
const LINK_PREFIX: &str = "<li><a href=\"";

const PLACEHOLDERS: [&str; 5] = [
    "${RUN_ID}",
    "${RUN_ID_URL}",
    "${APP_NAME}",
    "${VERSION}",
    "${WEBSITE}",
];

pub const HISEQ_DETAILED: &str = "hiseq_detailed";

fn placeholder_matcher() -> &'static AhoCorasick {
    static AC: OnceLock<AhoCorasick> = OnceLock::new();
    AC.get_or_init(|| AhoCorasick::new(PLACEHOLDERS).expect("placeholder automaton"))
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Block {
    Line(String),
    Section { name: String, lines: Vec<String> },
}

#[derive(Clone, Debug)]
pub struct Template {
    blocks: Vec<Block>,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, IndexError> {
        let mut blocks = Vec::new();
        let mut open: Option<(usize, String, Vec<String>)> = None;

        for (i, line) in text.lines().enumerate() {
            let lineno = i + 1;
            let trimmed = line.trim_start();
            if let Some(rest) = marker_rest(trimmed, START_MARKER) {
                if let Some((start, name, _)) = &open {
                    return Err(IndexError::Template {
                        line: lineno,
                        message: format!(
                            "section opened while section {:?} from line {} is still open",
                            name, start
                        ),
                    });
                }
                let name = rest
                    .split_whitespace()
                    .next()
                    .map(|s| s.trim_end_matches("-->").to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| IndexError::Template {
                        line: lineno,
                        message: "section marker without a name".into(),
                    })?;
                open = Some((lineno, name, Vec::new()));
            } else if marker_rest(trimmed, END_MARKER).is_some() {
                match open.take() {
                    Some((_, name, lines)) => blocks.push(Block::Section { name, lines }),
                    None => {
                        return Err(IndexError::Template {
                            line: lineno,
                            message: "section end without a matching start".into(),
                        });
                    }
                }
            } else if let Some((_, _, lines)) = &mut open {
                lines.push(line.to_string());
            } else {
                blocks.push(Block::Line(line.to_string()));
            }
        }

        if let Some((start, name, _)) = open {
            return Err(IndexError::Template {
                line: start,
                message: format!("section {:?} is never closed", name),
            });
        }
        Ok(Template { blocks })
    }

    /// Renders the template for `page`. With `prune_base` set, a
    /// `<li><a href="...">` line whose target is missing under that directory
    /// is dropped.
    pub fn render(
        &self,
        page: &IndexPage,
        presence: Presence,
        prune_base: Option<&Path>,
    ) -> Result<String, IndexError> {
        let active = active_sections(page, presence);
        let run_id = page.run_id.as_str();
        let replacements = [
            escape_html(run_id),
            encode_segment(run_id),
            html::APP_NAME.to_string(),
            html::VERSION.to_string(),
            html::WEBSITE.to_string(),
        ];
        let ac = placeholder_matcher();

        let mut out = String::with_capacity(8 * 1024);
        for block in &self.blocks {
            let lines = match block {
                Block::Line(line) => std::slice::from_ref(line),
                Block::Section { name, lines } if active.iter().any(|a| a == name) => {
                    lines.as_slice()
                }
                Block::Section { .. } => continue,
            };
            for line in lines {
                let line = ac.replace_all(line, &replacements);
                if let Some(base) = prune_base {
                    if !link_target_exists(&line, base)? {
                        continue;
                    }
                }
                out.push_str(&line);
                out.push('\n');
            }
        }
        Ok(out)
    }
}

/// Text after `marker` when the line really is that marker, i.e. the marker
/// is followed by whitespace, `-->` or the end of the line.
fn marker_rest<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with("-->") {
        Some(rest)
    } else {
        None
    }
}

/// Non-link lines, absolute URLs and unparsable links count as present.
fn link_target_exists(line: &str, base: &Path) -> Result<bool, IndexError> {
    let Some(rest) = line.trim_start().strip_prefix(LINK_PREFIX) else {
        return Ok(true);
    };
    let Some(end) = rest.find('"') else {
        return Ok(true);
    };
    let href = decode_href(&rest[..end]);
    if href.is_empty() || href.contains("://") {
        return Ok(true);
    }
    probe::exists(&base.join(href.trim_start_matches('/')))
}

/// Section names that are on the page. `hiseq_detailed` follows the HiSeq
/// section so that a disabled or pruned HiSeq block hides it too.
fn active_sections(page: &IndexPage, presence: Presence) -> Vec<&'static str> {
    let mut active: Vec<&'static str> = page.sections.iter().map(|s| s.kind.as_str()).collect();
    let hiseq_shown = page.sections.iter().any(|s| s.kind == SectionKind::HiSeq);
    if hiseq_shown && presence.hiseq_detailed {
        active.push(HISEQ_DETAILED);
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{self, LayoutOptions};
    use crate::core::model::RunId;

    const SAMPLE: &str = "\
<title>Run ${RUN_ID}</title>
<!--START_SECTION hiseq 1.x-->
<h2>HiSeq</h2>
<a href=\"report_${RUN_ID_URL}/First_Base_Report.htm\">First base</a>
<!--START_SECTION-->
<!--END_SECTION-->
<!--END_SECTION-->
<!--START_SECTION qc-->
<a href=\"qc_${RUN_ID_URL}/${RUN_ID_URL}.html\">QC</a>
<!--END_SECTION-->
<p>${APP_NAME} ${VERSION}</p>
";

    fn page(presence: Presence) -> IndexPage {
        let run_id = RunId::parse("R 1").unwrap();
        layout::build(&run_id, presence, &LayoutOptions::default())
    }

    #[test]
    fn nested_start_is_rejected() {
        let err = Template::parse(SAMPLE).unwrap_err();
        assert!(matches!(err, IndexError::Template { line: 5, .. }));
    }

    #[test]
    fn sections_follow_presence() {
        let text = SAMPLE.replace("<!--START_SECTION-->\n<!--END_SECTION-->\n", "");
        let tpl = Template::parse(&text).unwrap();
        let out = tpl
            .render(
                &page(Presence {
                    qc: true,
                    ..Presence::default()
                }),
                Presence {
                    qc: true,
                    ..Presence::default()
                },
                None,
            )
            .unwrap();
        assert!(out.starts_with("<title>Run R 1</title>\n"));
        assert!(!out.contains("HiSeq"));
        assert!(out.contains("<a href=\"qc_R%201/R%201.html\">QC</a>"));
        assert!(out.contains(&format!("<p>{} {}</p>", html::APP_NAME, html::VERSION)));
        assert!(!out.contains("SECTION"));
    }

    #[test]
    fn detailed_block_needs_hiseq() {
        let tpl = Template::parse(
            "<!--START_SECTION hiseq_detailed-->\nstatus\n<!--END_SECTION-->\n",
        )
        .unwrap();
        let detailed_only = Presence {
            hiseq_detailed: true,
            ..Presence::default()
        };
        assert_eq!(tpl.render(&page(detailed_only), detailed_only, None).unwrap(), "");

        let both = Presence {
            hiseq: true,
            hiseq_detailed: true,
            ..Presence::default()
        };
        assert_eq!(tpl.render(&page(both), both, None).unwrap(), "status\n");
    }

    #[test]
    fn unknown_section_is_dropped() {
        let tpl = Template::parse("a\n<!--START_SECTION sync-->\nb\n<!--END_SECTION-->\nc\n")
            .unwrap();
        let all = Presence {
            hiseq: true,
            hiseq_detailed: true,
            demux: true,
            qc: true,
        };
        assert_eq!(tpl.render(&page(all), all, None).unwrap(), "a\nc\n");
    }

    #[test]
    fn unbalanced_markers_are_errors() {
        assert!(matches!(
            Template::parse("<!--START_SECTION qc-->\nx\n"),
            Err(IndexError::Template { line: 1, .. })
        ));
        assert!(matches!(
            Template::parse("x\n<!--END_SECTION-->\n"),
            Err(IndexError::Template { line: 2, .. })
        ));
    }

    #[test]
    fn run_id_placeholder_is_escaped() {
        let run_id = RunId::parse("<i>").unwrap();
        let p = layout::build(&run_id, Presence::default(), &LayoutOptions::default());
        let tpl = Template::parse("${RUN_ID}|${RUN_ID_URL}").unwrap();
        assert_eq!(
            tpl.render(&p, Presence::default(), None).unwrap(),
            "&lt;i&gt;|%3Ci%3E\n"
        );
    }

    #[test]
    fn marker_prefix_must_end_the_word() {
        let tpl = Template::parse(
            "<!--START_SECTIONS qc-->\n<!--END_SECTIONS-->\n<!--START_SECTION\tqc-->\nx\n<!--END_SECTION\n",
        )
        .unwrap();
        let qc = Presence {
            qc: true,
            ..Presence::default()
        };
        assert_eq!(
            tpl.render(&page(qc), qc, None).unwrap(),
            "<!--START_SECTIONS qc-->\n<!--END_SECTIONS-->\nx\n"
        );
    }

    #[test]
    fn pruning_drops_missing_link_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("basecall_stats_R1")).unwrap();
        std::fs::write(dir.path().join("basecall_stats_R1/All.htm"), "x").unwrap();

        let tpl = Template::parse(
            "<!--START_SECTION demux-->
<ul>
<li><a href=\"basecall_stats_${RUN_ID_URL}/All.htm\">All</a></li>
<li><a href=\"basecall_stats_${RUN_ID_URL}/IVC.htm\">IVC</a></li>
<li><a href=\"https://example.org/help\">Help</a></li>
</ul>
<!--END_SECTION-->
",
        )
        .unwrap();
        let demux = Presence {
            demux: true,
            ..Presence::default()
        };
        let run_id = RunId::parse("R1").unwrap();
        let p = layout::build(&run_id, demux, &LayoutOptions::default());

        let pruned = tpl.render(&p, demux, Some(dir.path())).unwrap();
        assert!(pruned.contains("basecall_stats_R1/All.htm"));
        assert!(!pruned.contains("IVC.htm"));
        assert!(pruned.contains("https://example.org/help"));
        assert!(pruned.contains("<ul>\n"));

        let full = tpl.render(&p, demux, None).unwrap();
        assert!(full.contains("basecall_stats_R1/IVC.htm"));
    }
}

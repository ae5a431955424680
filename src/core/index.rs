use crate::core::error::IndexError;
use crate::core::layout::{self, LayoutOptions};
use crate::core::model::{IndexPage, Presence, RunId};
use crate::report::html::{self, HtmlOptions};
use crate::report::template::Template;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub layout: LayoutOptions,
    pub html: HtmlOptions,
    /// Replaces the built-in page markup when set.
    pub template: Option<Arc<Template>>,
}

pub struct Rendered {
    pub presence: Presence,
    pub page: IndexPage,
    pub html: String,
}

/// Renders the index page for `run_id` with default options.
pub fn render(run_id: &str, base_dir: &Path) -> Result<String, IndexError> {
    render_with(run_id, base_dir, &RenderOptions::default()).map(|r| r.html)
}

pub fn render_with(
    run_id: &str,
    base_dir: &Path,
    opts: &RenderOptions,
) -> Result<Rendered, IndexError> {
    let run_id = RunId::parse(run_id)?;
    let (presence, page) = layout::build_for_dir(base_dir, &run_id, &opts.layout)?;
    let html = match &opts.template {
        Some(tpl) => {
            let prune_base = opts.layout.prune_missing_links.then_some(base_dir);
            tpl.render(&page, presence, prune_base)?
        }
        None => html::render_page(&page, &opts.html)?,
    };
    Ok(Rendered {
        presence,
        page,
        html,
    })
}

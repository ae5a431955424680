use crate::cli::args::{BatchArgs, Cli, Commands, PageArgs, RenderArgs, SectionArg};
use crate::core::batch;
use crate::core::index::{self, RenderOptions, Rendered};
use crate::core::layout::LayoutOptions;
use crate::core::model::SectionKind;
use crate::report::html::HtmlOptions;
use crate::report::template::Template;
use crate::report::write::write_atomic;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Batch(args) => render_batch(args),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    let t_opts = Instant::now();
    let opts = render_options(&args.page)?;
    stage_done(stats, "options", t_opts);

    let t_render = Instant::now();
    let rendered = index::render_with(&args.run_id, &args.page.base_dir, &opts)
        .with_context(|| format!("failed to render index for run {:?}", args.run_id))?;
    stage_done(stats, "render", t_render);

    let t_out = Instant::now();
    match &args.out {
        Some(path) => write_atomic(path, &rendered.html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.html.as_bytes())?;
            stdout.flush()?;
        }
    }
    stage_done(stats, "output", t_out);

    if stats {
        log_summary(&args.run_id, &rendered);
        eprintln!("KIRA_STATS total={}", fmt_dur(t0.elapsed()));
    }
    Ok(())
}

fn render_batch(args: BatchArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    if args.threads == 0 {
        bail!("--threads must be >= 1");
    }

    let t_opts = Instant::now();
    let opts = render_options(&args.page)?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output dir {}", args.out_dir.display()))?;
    stage_done(stats, "options", t_opts);

    let t_render = Instant::now();
    let results = batch::render_many(&args.run_ids, &args.page.base_dir, &opts, args.threads);
    stage_done(stats, "render", t_render);

    let t_out = Instant::now();
    let mut failed = 0usize;
    for r in &results {
        let rendered = match &r.result {
            Ok(rendered) => rendered,
            Err(e) => {
                eprintln!("error: run {:?}: {}", r.run_id, e);
                failed += 1;
                continue;
            }
        };
        let path = args.out_dir.join(format!("index_{}.html", r.run_id));
        if let Err(e) = write_atomic(&path, &rendered.html) {
            eprintln!("error: run {:?}: {:#}", r.run_id, e);
            failed += 1;
            continue;
        }
        if stats {
            log_summary(&r.run_id, rendered);
        }
    }
    stage_done(stats, "output", t_out);

    if stats {
        eprintln!(
            "KIRA_STATS runs={} failed={} threads={}",
            results.len(),
            failed,
            args.threads
        );
        eprintln!("KIRA_STATS total={}", fmt_dur(t0.elapsed()));
    }

    if failed > 0 {
        bail!("{} of {} runs failed", failed, results.len());
    }
    Ok(())
}

fn render_options(page: &PageArgs) -> Result<RenderOptions> {
    let template = match &page.template {
        Some(path) => Some(Arc::new(
            Template::load(path)
                .with_context(|| format!("failed to load template {}", path.display()))?,
        )),
        None => None,
    };
    Ok(RenderOptions {
        layout: LayoutOptions {
            sections: page.sections.iter().map(|&s| section_kind(s)).collect(),
            prune_missing_links: page.prune_missing,
        },
        html: HtmlOptions {
            logo: page.logo.clone(),
        },
        template,
    })
}

fn section_kind(arg: SectionArg) -> SectionKind {
    match arg {
        SectionArg::Hiseq => SectionKind::HiSeq,
        SectionArg::Demux => SectionKind::Demux,
        SectionArg::Qc => SectionKind::Qc,
    }
}

fn log_summary(run_id: &str, rendered: &Rendered) {
    eprintln!(
        "KIRA_STATS run={} sections={} links={} bytes={}",
        run_id,
        rendered.page.sections.len(),
        rendered.page.link_count(),
        rendered.html.len()
    );
}

fn stats_enabled() -> bool {
    matches!(env::var("KIRA_STATS").as_deref(), Ok("1"))
}

fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("KIRA_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}

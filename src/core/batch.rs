use crate::core::error::IndexError;
use crate::core::index::{self, RenderOptions, Rendered};
use crossbeam_channel as channel;
use std::path::Path;
use std::thread;

pub struct BatchResult {
    pub run_id: String,
    pub result: Result<Rendered, IndexError>,
}

/// Renders every run in `run_ids` using `threads` workers. Each run touches
/// its own set of paths, so workers share nothing but the options.
/// Results come back in input order.
pub fn render_many(
    run_ids: &[String],
    base_dir: &Path,
    opts: &RenderOptions,
    threads: usize,
) -> Vec<BatchResult> {
    let threads = threads.max(1).min(run_ids.len().max(1));
    let (job_tx, job_rx) = channel::bounded::<usize>(threads * 2);
    let (result_tx, result_rx) = channel::unbounded::<(usize, Result<Rendered, IndexError>)>();

    thread::scope(|s| {
        s.spawn(move || {
            for i in 0..run_ids.len() {
                if job_tx.send(i).is_err() {
                    return;
                }
            }
        });

        for _ in 0..threads {
            let rx = job_rx.clone();
            let tx = result_tx.clone();
            s.spawn(move || {
                for i in rx.iter() {
                    let res = index::render_with(&run_ids[i], base_dir, opts);
                    if tx.send((i, res)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);
    });

    let mut parts: Vec<Option<Result<Rendered, IndexError>>> =
        (0..run_ids.len()).map(|_| None).collect();
    for (i, res) in result_rx.iter() {
        parts[i] = Some(res);
    }

    run_ids
        .iter()
        .zip(parts)
        .map(|(run_id, part)| BatchResult {
            run_id: run_id.clone(),
            result: part.unwrap_or_else(|| {
                Err(IndexError::Io(std::io::Error::other("worker exited before rendering")))
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn results_follow_input_order() {
        let dir = TempDir::new().unwrap();
        let ids: Vec<String> = (0..20).map(|i| format!("1501{:02}_RUN{:02}", i, i)).collect();
        for id in ids.iter().step_by(2) {
            fs::create_dir(dir.path().join(format!("qc_{}", id))).unwrap();
        }
        let out = render_many(&ids, dir.path(), &RenderOptions::default(), 4);
        assert_eq!(out.len(), ids.len());
        for (i, r) in out.iter().enumerate() {
            assert_eq!(r.run_id, ids[i]);
            let rendered = r.result.as_ref().unwrap();
            assert_eq!(rendered.page.sections.len(), if i % 2 == 0 { 1 } else { 0 });
        }
    }

    #[test]
    fn bad_ids_fail_individually() {
        let dir = TempDir::new().unwrap();
        let ids = vec!["R1".to_string(), String::new(), "R3".to_string()];
        let out = render_many(&ids, dir.path(), &RenderOptions::default(), 8);
        assert!(out[0].result.is_ok());
        assert!(matches!(out[1].result, Err(IndexError::InvalidInput(_))));
        assert!(out[2].result.is_ok());
    }

    #[test]
    fn empty_batch() {
        let dir = TempDir::new().unwrap();
        assert!(render_many(&[], dir.path(), &RenderOptions::default(), 2).is_empty());
    }
}

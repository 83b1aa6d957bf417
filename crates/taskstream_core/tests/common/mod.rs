#![allow(dead_code)]

use std::sync::Once;

use taskstream_core::{update, AppState, Effect, Job, JobsPage, Msg, RequestId};

pub const T0: u64 = 1_000_000;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn job(n: usize) -> Job {
    Job {
        id: format!("job-{n}"),
        name: format!("sim-{n}"),
        owner: "alice".to_string(),
        site: "JUDAC".to_string(),
        status: if n % 2 == 0 { "RUNNING" } else { "SUCCESSFUL" }.to_string(),
        resource_url: format!("https://hpc.example/jobs/{n}"),
        start_time: "01.02.2023, 10:00:00".to_string(),
        is_cancelable: n % 2 == 0,
        logs: vec![format!("started {n}"), format!("running {n}")],
    }
}

pub fn page_of(count: usize) -> JobsPage {
    JobsPage {
        message: String::new(),
        jobs: (0..count).map(job).collect(),
    }
}

pub fn sites() -> Vec<String> {
    vec!["JUDAC".to_string(), "DAINT-CSCS".to_string()]
}

pub fn mount(default_site: Option<&str>) -> (AppState, Vec<Effect>) {
    update(
        AppState::new(),
        Msg::Mounted {
            sites: sites(),
            default_site: default_site.map(str::to_string),
            message: "sites loaded".to_string(),
            now_ms: T0,
        },
    )
}

/// `(request, site, page)` of every fetch in `effects`.
pub fn fetches(effects: &[Effect]) -> Vec<(RequestId, String, u32)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchJobs {
                request,
                site,
                page,
            } => Some((*request, site.clone(), *page)),
            _ => None,
        })
        .collect()
}

pub fn fetch_requests(effects: &[Effect]) -> Vec<RequestId> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchJobs { request, .. } => Some(*request),
            _ => None,
        })
        .collect()
}

/// Mounts on JUDAC and completes the first fetch with `count` jobs.
pub fn loaded_state(count: usize) -> AppState {
    let (state, effects) = mount(Some("JUDAC"));
    let request = fetch_requests(&effects)[0];
    let (state, _) = update(
        state,
        Msg::JobsLoaded {
            request,
            result: Ok(page_of(count)),
            now_ms: T0,
        },
    );
    state
}

use crate::cli::ExtractArgs;
use crate::support::{
    stream_sites_into_channel, BamAlignmentSource, IndelSite, IndelTypes, SiteFilter,
    SupportThresholds,
};
use crate::utils::{get_bam_header, get_sample_name, is_bam_mapped, Result};
use crate::workflows::{observe_site, Observation, Params};
use crate::writers::ObservationWriter;
use crossbeam_channel::{bounded, Sender};
use rayon::{
    iter::{ParallelBridge, ParallelIterator},
    ThreadPoolBuilder,
};
use std::{cell::RefCell, path::Path, path::PathBuf, sync::Arc, thread};

#[derive(Debug, Clone)]
struct ThreadContextParams {
    healthy_path: PathBuf,
    tumour_path: PathBuf,
    primary_only: bool,
}

struct SamplePair {
    healthy: BamAlignmentSource,
    tumour: BamAlignmentSource,
}

thread_local! {
    static CTX_PARAMS: RefCell<Option<ThreadContextParams>> = const { RefCell::new(None) };
    // Opened on first use so that every worker owns its readers
    static THREAD_SOURCES: RefCell<Option<SamplePair>> = const { RefCell::new(None) };
}

const CHANNEL_BUFFER_SIZE: usize = 2048;

fn open_thread_sources() -> Result<SamplePair> {
    let ctx = CTX_PARAMS
        .with(|cell| cell.borrow().clone())
        .ok_or("Thread context parameters not initialized for BAM paths")?;
    Ok(SamplePair {
        healthy: BamAlignmentSource::from_path(&ctx.healthy_path, ctx.primary_only)?,
        tumour: BamAlignmentSource::from_path(&ctx.tumour_path, ctx.primary_only)?,
    })
}

fn check_bam(path: &Path, label: &str) -> Result<String> {
    let header = get_bam_header(path)?;
    if !is_bam_mapped(&header) {
        return Err(format!("Input {} BAM is not mapped", label));
    }
    let sample_name = get_sample_name(path, &header)?;
    log::info!("{} sample: {}", label, sample_name);
    Ok(sample_name)
}

fn site_filter(args: &ExtractArgs) -> Result<SiteFilter> {
    if let (Some(min), Some(max)) = (args.min_len, args.max_len) {
        if min > max {
            return Err(format!(
                "Minimum length {} exceeds maximum length {}",
                min, max
            ));
        }
    }
    let types = match (args.deletions_only, args.insertions_only) {
        (true, _) => IndelTypes::Deletions,
        (_, true) => IndelTypes::Insertions,
        _ => IndelTypes::Both,
    };
    Ok(SiteFilter {
        types,
        min_len: args.min_len,
        max_len: args.max_len,
        region: args.region.clone(),
    })
}

pub fn extract(args: ExtractArgs) -> Result<()> {
    let healthy_name = check_bam(&args.healthy_path, "Healthy")?;
    let tumour_name = check_bam(&args.tumour_path, "Tumour")?;
    if healthy_name == tumour_name {
        log::warn!(
            "Healthy and tumour samples share the name {}",
            healthy_name
        );
    }

    let filter = site_filter(&args)?;
    let thresholds = SupportThresholds {
        len_tol_del: args.len_tol_del,
        len_tol_ins: args.len_tol_ins,
        centerpoint_tol_del: args.centerpoint_tol_del,
        centerpoint_tol_ins: args.centerpoint_tol_ins,
    };
    let workflow_params = Arc::new(Params {
        policy: args.aligner.policy(thresholds),
        search_range: args.search_range,
    });
    log::debug!("Matching policy: {:?}", workflow_params.policy);

    let mut writer = ObservationWriter::new(&args.output_path)?;

    let (sender_site, receiver_site) = bounded(CHANNEL_BUFFER_SIZE);
    let candidates_path = args.candidates_path.clone();
    let site_stream_thread =
        thread::spawn(move || stream_sites_into_channel(&candidates_path, &filter, sender_site));

    let (sender_result, receiver_result) = bounded(CHANNEL_BUFFER_SIZE);
    let writer_thread = thread::spawn(move || writer.write_ordered(receiver_result));

    log::debug!(
        "Initializing thread pool with {} threads...",
        args.num_threads
    );
    let pool = initialize_thread_pool(
        args.num_threads,
        ThreadContextParams {
            healthy_path: args.healthy_path.clone(),
            tumour_path: args.tumour_path.clone(),
            primary_only: args.primary_only,
        },
    )?;
    pool.install(|| {
        receiver_site
            .into_iter()
            .par_bridge()
            .for_each_with(&sender_result, |s, site_result| match site_result {
                Ok((index, site)) => process_site(index, site, &workflow_params, s),
                Err(err) => log::error!("Candidate streaming: {}", err),
            });
    });

    // Clean-up
    drop(sender_result);
    let n_written = writer_thread
        .join()
        .map_err(|_| "Writer thread panicked".to_string())??;
    log::trace!("Writer thread finished");
    site_stream_thread
        .join()
        .map_err(|_| "Candidate stream thread panicked".to_string())??;
    log::info!("Wrote {} observations", n_written);

    Ok(())
}

fn process_site(
    index: usize,
    site: IndelSite,
    workflow_params: &Params,
    sender_result: &Sender<(usize, Result<Observation>)>,
) {
    let result = THREAD_SOURCES.with(|cell| -> Result<Observation> {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(open_thread_sources()?);
        }
        let sources = slot
            .as_mut()
            .ok_or("Thread alignment sources not initialized")?;
        observe_site(
            site,
            workflow_params,
            &mut sources.healthy,
            &mut sources.tumour,
        )
    });
    if let Err(e) = sender_result.send((index, result)) {
        log::error!("Failed to send observation to writer thread: {}", e);
    }
}

fn initialize_thread_pool(
    num_threads: usize,
    thread_context: ThreadContextParams,
) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("posom-{}", i))
        .start_handler(move |_thread_index| {
            CTX_PARAMS.with(|cell| {
                *cell.borrow_mut() = Some(thread_context.clone());
            });
            log::trace!("Initialized thread {:?}", std::thread::current().id());
        })
        .exit_handler(|_thread_index| {
            THREAD_SOURCES.with(|cell| {
                *cell.borrow_mut() = None;
            });
            CTX_PARAMS.with(|cell| {
                *cell.borrow_mut() = None;
            });
        })
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}

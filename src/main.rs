use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use talent_bridge::config::{AppConfig, AppEnvironment};
use talent_bridge::error::AppError;
use talent_bridge::telemetry;
use talent_bridge::workflows::jobs::applications::memory::{
    MemoryApplicationStore, MemoryDispatcher, MemoryDocumentStore, MemoryJobStore,
    MemoryProfileStore,
};
use talent_bridge::workflows::jobs::applications::{
    application_router, ApplicationLifecycleService, ApplicationStatus, Document, DocumentId,
    DocumentType, Education, EligibilityConfig, IdentityDetails, JobId, JobPosting, JobSeekerId,
    JobStatus, Profile, SubmissionRequest, VerificationStatus,
};
use tracing::info;

type MemoryLifecycleService = ApplicationLifecycleService<
    MemoryJobStore,
    MemoryProfileStore,
    MemoryDocumentStore,
    MemoryApplicationStore,
    MemoryDispatcher,
>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Talent Bridge",
    about = "Run the job application lifecycle and eligibility service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk a sample application through the full lifecycle offline
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Expiry sweep window in days (defaults to the configured horizon)
    #[arg(long)]
    horizon_days: Option<i64>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

fn build_service(config: EligibilityConfig) -> (Arc<MemoryLifecycleService>, Arc<MemoryDispatcher>) {
    let jobs = Arc::new(MemoryJobStore::default());
    let profiles = Arc::new(MemoryProfileStore::default());
    let documents = Arc::new(MemoryDocumentStore::default());
    let applications = Arc::new(MemoryApplicationStore::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());

    seed_sample_data(&jobs, &profiles, &documents, Utc::now());

    let service = Arc::new(ApplicationLifecycleService::new(
        jobs,
        profiles,
        documents,
        applications,
        dispatcher.clone(),
        config,
    ));

    (service, dispatcher)
}

fn seed_sample_data(
    jobs: &MemoryJobStore,
    profiles: &MemoryProfileStore,
    documents: &MemoryDocumentStore,
    now: DateTime<Utc>,
) {
    let seeker = JobSeekerId("seeker-ayan".to_string());

    let seeded = jobs
        .upsert(JobPosting {
            id: JobId("job-welder-001".to_string()),
            title: "Certified Welder".to_string(),
            required_documents: vec![DocumentType::Passport, DocumentType::Resume],
            required_skills: vec!["MIG welding".to_string(), "Blueprint reading".to_string()],
            status: JobStatus::Active,
            expires_at: now + Duration::days(45),
        })
        .and_then(|_| {
            profiles.upsert(Profile {
                seeker_id: seeker.clone(),
                headline: Some("Structural welder, 8 years on site".to_string()),
                summary: Some("Certified welder looking for sponsored placement".to_string()),
                education: vec![Education {
                    institution: "Dhaka Polytechnic".to_string(),
                    credential: "Welding certificate".to_string(),
                    graduated_on: None,
                }],
                skills: vec!["MIG welding".to_string(), "TIG welding".to_string()],
                languages: vec!["Bengali".to_string(), "English".to_string()],
                identity: Some(IdentityDetails {
                    legal_name: "Ayan Rahman".to_string(),
                    nationality: "Bangladeshi".to_string(),
                    date_of_birth: chrono::NaiveDate::from_ymd_opt(1992, 3, 14)
                        .unwrap_or_default(),
                }),
            })
        })
        .and_then(|_| {
            documents.upsert(Document {
                id: DocumentId("doc-passport-ayan".to_string()),
                owner: seeker.clone(),
                doc_type: DocumentType::Passport,
                verification_status: VerificationStatus::Verified,
                expiry_date: Some(now + Duration::days(20)),
                notification_sent: false,
            })
        })
        .and_then(|_| {
            documents.upsert(Document {
                id: DocumentId("doc-resume-ayan".to_string()),
                owner: seeker,
                doc_type: DocumentType::Resume,
                verification_status: VerificationStatus::Verified,
                expiry_date: None,
                notification_sent: false,
            })
        });

    if let Err(err) = seeded {
        eprintln!("failed to seed sample data: {err}");
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let (service, _dispatcher) = build_service(config.engine.eligibility_config());
    if config.environment == AppEnvironment::Development {
        info!("development environment: in-memory stores seeded with sample records");
    }

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(application_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "application lifecycle service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let horizon = args
        .horizon_days
        .unwrap_or(config.engine.expiry_horizon_days);
    let now = Utc::now();

    let (service, dispatcher) = build_service(config.engine.eligibility_config());
    let seeker = JobSeekerId("seeker-ayan".to_string());
    let job = JobId("job-welder-001".to_string());

    println!("Application lifecycle demo");

    let verdict = service.check_eligibility(&seeker, &job, now)?;
    println!(
        "\nEligibility for {} on {}: {}",
        seeker.0,
        job.0,
        if verdict.eligible { "eligible" } else { "not eligible" }
    );
    for reason in &verdict.reasons {
        println!("- {reason}");
    }

    let application = service.submit_application(
        SubmissionRequest {
            job_id: job,
            seeker_id: seeker,
            cover_letter: Some("Available from next month.".to_string()),
            document_ids: vec![
                DocumentId("doc-passport-ayan".to_string()),
                DocumentId("doc-resume-ayan".to_string()),
            ],
        },
        now,
    )?;
    println!("\nSubmitted application {}", application.id.0);

    let application = service.advance_application(
        &application.id,
        ApplicationStatus::Reviewing,
        Some("Screening call booked".to_string()),
        now,
    )?;
    let application = service.advance_application(
        &application.id,
        ApplicationStatus::Shortlisted,
        Some("Strong certificates".to_string()),
        now,
    )?;

    println!("\nHistory for {}", application.id.0);
    for entry in &application.history {
        let note = entry.note.as_deref().unwrap_or("-");
        println!("- {} at {} ({note})", entry.status, entry.changed_at);
    }

    let fired = service.sweep_document_expirations(now, horizon)?;
    println!("\nExpiry sweep over {horizon} days fired {} intent(s)", fired.len());
    for intent in &fired {
        println!("- {} -> {}", intent.dedupe_key, intent.recipient.0);
    }

    let repeat = service.sweep_document_expirations(now, horizon)?;
    println!("Second sweep fired {} intent(s)", repeat.len());

    println!("\nDispatched notifications: {}", dispatcher.delivered().len());
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

//! `siicop` command-line client.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use siicop_lib::chat_session::SubmitOutcome;
use siicop_lib::format::{fecha_cierre_texto, format_rango_corto};
use siicop_lib::state::estado_por_fecha;
use siicop_lib::types::Licitacion;
use siicop_lib::use_cases::FilterCriteria;
use siicop_lib::wizard::packaging::{default_output_dir, UploadedFile};
use siicop_lib::{init_logging, load_config, AppContext, Backend, ClientError, ErrorPayload};

#[derive(Parser, Debug)]
#[command(name = "siicop")]
#[command(version, about = "Cliente SIICOP de licitaciones públicas")]
struct Args {
    /// Tender backend: mock or live (overrides configuration)
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List matched tenders
    Licitaciones {
        #[arg(long)]
        buscar: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        region: Option<String>,
    },
    /// Show one tender
    Licitacion { id: String },
    /// Show a tender's document checklist
    Documentos { id: String },
    /// Upload files into a tender's checklist and write the ZIP package
    Empaquetar {
        id: String,
        /// `<docId>=<path>`, repeatable
        #[arg(long = "archivo", value_parser = parse_archivo)]
        archivos: Vec<(String, PathBuf)>,
        /// Output directory (defaults to the download directory)
        #[arg(long)]
        salida: Option<PathBuf>,
    },
    /// Send one message to the assistant
    Chat { mensaje: String },
    /// Ask the assistant for the conversation summary
    Finalizar,
    /// List notifications
    Notificaciones {
        #[arg(long)]
        no_leidas: bool,
    },
}

fn parse_archivo(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((id, path)) if !id.is_empty() && !path.is_empty() => {
            Ok((id.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("se esperaba <docId>=<ruta>, se recibió '{}'", raw)),
    }
}

fn print_licitacion(l: &Licitacion, today: chrono::NaiveDate) {
    println!(
        "{}  {}  [{}]",
        l.id,
        l.nombre,
        estado_por_fecha(l, today).label()
    );
    println!(
        "    {} · {} · {} · {}",
        l.entidad,
        l.region,
        format_rango_corto(l.monto_min, l.monto_max),
        fecha_cierre_texto(&l.fecha_cierre)
    );
}

async fn run(args: Args) -> Result<(), ClientError> {
    let mut config = load_config()?;
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    let ctx = AppContext::new(config)?;
    let today = chrono::Local::now().date_naive();

    match args.command {
        Command::Licitaciones {
            buscar,
            sector,
            region,
        } => {
            let criteria = FilterCriteria {
                search_query: buscar,
                sector,
                region,
            };
            let found = ctx.filter_licitaciones(&criteria).await?;
            for l in &found {
                print_licitacion(l, today);
            }
            println!("{} licitaciones", found.len());
        }
        Command::Licitacion { id } => {
            let l = ctx
                .licitacion(&id)
                .await?
                .ok_or_else(|| ClientError::NotFound("Licitación no encontrada".to_string()))?;
            print_licitacion(&l, today);
            println!("    {} · {}", l.tipo_contrato, l.sector);
            println!(
                "    Documentos: {}/{} ({}%)",
                l.documentos_completados,
                l.documentos_total,
                l.progress_percent()
            );
            println!();
            println!("{}", l.resumen);
        }
        Command::Documentos { id } => {
            let wizard = ctx.open_wizard(&id).await?;
            wizard.with(|w| {
                let resumen = w.resumen_estado();
                println!(
                    "{}: {}% aprobado ({} de {})",
                    w.licitacion().nombre,
                    w.progress_percent(),
                    resumen.aprobados,
                    resumen.total_documentos
                );
                for (i, d) in w.documentos().iter().enumerate() {
                    println!(
                        "  [{}] {:<4} {:<12} {:<16} {}",
                        i / siicop_lib::wizard::DOCUMENTS_PER_STEP + 1,
                        d.id,
                        d.categoria.label(),
                        d.estado.label(),
                        d.nombre
                    );
                }
            })?;
        }
        Command::Empaquetar {
            id,
            archivos,
            salida,
        } => {
            let wizard = ctx.open_wizard(&id).await?;
            for (doc_id, path) in &archivos {
                let file = UploadedFile::from_path(path).await?;
                wizard.upload(doc_id, file)?;
            }
            let package = wizard.with(|w| w.package(today))??;
            let dir = salida.unwrap_or_else(default_output_dir);
            let path = package.save_to(&dir).await?;
            for entry in &package.entries {
                println!("  {}", entry);
            }
            println!("{}", path.display());
        }
        Command::Chat { mensaje } => {
            let session = ctx.chat_session();
            match session
                .submit(&mensaje)
                .await
                .map_err(|e| ClientError::Validation(e.to_string()))?
            {
                SubmitOutcome::Sent(reply) | SubmitOutcome::Finalized(reply) => {
                    println!("{}", reply.content)
                }
                SubmitOutcome::Ignored => {}
            }
        }
        Command::Finalizar => {
            println!("{}", ctx.finalize_chat().await?);
        }
        Command::Notificaciones { no_leidas } => {
            let list = if no_leidas {
                ctx.unread_notificaciones().await?
            } else {
                ctx.notificaciones().await?
            };
            for n in &list {
                println!(
                    "{} {:<10} {}  {}",
                    if n.leida { " " } else { "*" },
                    format!("{:?}", n.tipo).to_lowercase(),
                    n.fecha,
                    n.titulo
                );
                println!("    {}", n.descripcion);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(if args.verbose { "debug" } else { "info" });

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let payload = ErrorPayload::from(&e);
            eprintln!("Error: {}", payload.message);
            ExitCode::FAILURE
        }
    }
}

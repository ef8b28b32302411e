//! Property tests over the pure parts of the client: formatting, checklist
//! state and the read cache.

use chrono::NaiveDate;
use proptest::prelude::*;

use siicop_lib::format::{group_thousands, Money};
use siicop_lib::query_cache::{QueryCache, QueryKey};
use siicop_lib::repositories::fixtures;
use siicop_lib::repositories::licitaciones::map_dto;
use siicop_lib::routes::Route;
use siicop_lib::services::licitaciones::mock_response;
use siicop_lib::types::{Documento, DocumentoEstado, ResumenEstado};
use siicop_lib::wizard::packaging::UploadedFile;
use siicop_lib::wizard::{parse_amount, ChecklistWizard, DOCUMENTS_PER_STEP};

#[derive(Debug, Clone)]
enum Op {
    Upload(usize),
    Advance,
    Back,
    Next,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::Upload),
        Just(Op::Advance),
        Just(Op::Back),
        Just(Op::Next),
    ]
}

fn estado() -> impl Strategy<Value = DocumentoEstado> {
    (0usize..DocumentoEstado::ALL.len()).prop_map(|i| DocumentoEstado::ALL[i])
}

fn wizard() -> ChecklistWizard {
    let licitacion = map_dto(&mock_response().licitaciones[0]);
    let documentos = fixtures::documentos();
    let resumen = ResumenEstado::from_documentos(&documentos);
    ChecklistWizard::new(licitacion, documentos, resumen)
}

proptest! {
    #[test]
    fn grouping_preserves_digits(value in any::<u64>()) {
        let grouped = group_thousands(value);
        prop_assert_eq!(grouped.replace('.', ""), value.to_string());
        for group in grouped.split('.').skip(1) {
            prop_assert_eq!(group.len(), 3);
        }
    }

    #[test]
    fn formatted_money_parses_back(value in 1u64..1_000_000_000_000) {
        prop_assert_eq!(parse_amount(&Money::cop(value).format()), Some(value));
    }

    #[test]
    fn resumen_counts_fit_total(estados in prop::collection::vec(estado(), 0..20)) {
        let docs: Vec<Documento> = estados
            .iter()
            .enumerate()
            .map(|(i, estado)| Documento {
                id: i.to_string(),
                nombre: format!("Documento {}", i),
                categoria: fixtures::documentos()[0].categoria,
                estado: *estado,
                observaciones: None,
                fecha_carga: None,
            })
            .collect();
        let resumen = ResumenEstado::from_documentos(&docs);
        let counted = resumen.aprobados + resumen.pendientes + resumen.requiere_accion + resumen.vencidos;
        prop_assert!(counted <= resumen.total_documentos);
        prop_assert!(resumen.progress_percent() <= 100);
    }

    #[test]
    fn wizard_stays_in_bounds(ops in prop::collection::vec(op(), 0..30)) {
        let mut w = wizard();
        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let ids: Vec<String> = w.documentos().iter().map(|d| d.id.clone()).collect();
        let mut uploaded = false;

        for op in ops {
            match op {
                Op::Upload(i) => {
                    let result = w.upload(
                        ids.get(i).map(String::as_str).unwrap_or("nope"),
                        UploadedFile::new("soporte.pdf", b"%PDF".to_vec()),
                    );
                    prop_assert_eq!(result.is_ok(), i < ids.len());
                    uploaded |= result.is_ok();
                }
                Op::Advance => {
                    if let Some(step) = w.pending_advance() {
                        w.apply_scheduled_advance(step);
                    }
                }
                Op::Back => {
                    w.back();
                }
                Op::Next => {
                    let _ = w.next(today);
                }
            }

            prop_assert!(w.current_step() < w.total_steps());
            prop_assert!(w.current_documents().len() <= DOCUMENTS_PER_STEP);
            prop_assert!(w.completion_score() <= 100);
            if uploaded {
                prop_assert_eq!(w.resumen_estado(), ResumenEstado::from_documentos(w.documentos()));
            }
        }
    }

    #[test]
    fn tender_routes_round_trip(id in "[A-Z]{3}-[0-9]{1,4}") {
        let route = Route::Licitacion(id.clone());
        prop_assert_eq!(Route::parse(&route.path()), route);
        let resumen = Route::ResumenFinal(id);
        prop_assert_eq!(Route::parse(&resumen.path()), resumen);
    }

    #[test]
    fn invalidation_drops_whole_prefix(ids in prop::collection::vec("[a-z0-9]{1,6}", 1..10)) {
        let cache = QueryCache::new();
        cache.set(QueryKey::notificaciones(), &0);
        for id in &ids {
            cache.set(QueryKey::documentos_licitacion(id), &1);
            cache.set(QueryKey::resumen_estado(id), &2);
        }
        cache.invalidate(&QueryKey::documentos());
        prop_assert_eq!(cache.len(), 1);
        for id in &ids {
            prop_assert!(!cache.contains(&QueryKey::documentos_licitacion(id)));
        }
    }
}

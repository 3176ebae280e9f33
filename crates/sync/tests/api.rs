mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use api_types::{categoria::TipoCategoria, transaccion::TipoTransaccion, usuario::UsuarioNuevo};
use common::FakeBackend;
use isay_sync::{
    AuthApi, CategoryCatalog, DashboardApi, FormSessionController, HttpResourceClient,
    ProfileController, Resource, ResourceKind, SyncError,
};

async fn client(backend: &FakeBackend) -> HttpResourceClient {
    let base_url = backend.spawn().await;
    HttpResourceClient::new(&base_url).unwrap()
}

#[tokio::test]
async fn login_sends_backend_field_names() {
    let backend = FakeBackend::new();
    backend.respond(
        Method::POST,
        "/login",
        json!({ "mensaje": "Login exitoso", "usuario": "ana", "usuario_id": 4 }),
    );
    let auth = AuthApi::new(client(&backend).await);

    let res = auth.login(" ana@correo.com ", "secreta").await.unwrap();

    assert_eq!(res.usuario_id, 4);
    assert_eq!(res.usuario.as_deref(), Some("ana"));
    let posts = backend.requests_for(Method::POST, "/login");
    assert_eq!(
        posts[0].body,
        Some(json!({ "correo": "ana@correo.com", "contraseña_hash": "secreta" }))
    );
}

#[tokio::test]
async fn wrong_password_carries_the_server_detail() {
    let backend = FakeBackend::new();
    backend.fail_next(
        StatusCode::UNAUTHORIZED,
        json!({ "detail": "Credenciales inválidas" }),
    );
    let auth = AuthApi::new(client(&backend).await);

    let err = auth.login("ana@correo.com", "mala").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.detail().as_deref(), Some("Credenciales inválidas"));
}

#[tokio::test]
async fn register_returns_the_new_user() {
    let backend = FakeBackend::new();
    backend.respond(
        Method::POST,
        "/register",
        json!({ "id": 9, "nombre_usuario": "ana", "correo": "ana@correo.com", "telefono": null }),
    );
    let auth = AuthApi::new(client(&backend).await);

    let usuario = auth
        .register(&UsuarioNuevo {
            nombre_usuario: "ana".to_string(),
            correo: "ana@correo.com".to_string(),
            contrasena: "secreta".to_string(),
            telefono: None,
        })
        .await
        .unwrap();

    assert_eq!(usuario.id, 9);
    let body = backend.requests_for(Method::POST, "/register")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["contraseña"], json!("secreta"));
}

#[tokio::test]
async fn blank_login_is_rejected_before_sending() {
    let backend = FakeBackend::new();
    let auth = AuthApi::new(client(&backend).await);

    let err = auth.login("  ", "").await.unwrap_err();

    assert_eq!(
        err,
        SyncError::Validation {
            missing_fields: vec!["correo".to_string(), "contraseña".to_string()],
        }
    );
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn incomplete_registration_is_rejected_before_sending() {
    let backend = FakeBackend::new();
    let auth = AuthApi::new(client(&backend).await);

    let err = auth
        .register(&UsuarioNuevo {
            nombre_usuario: String::new(),
            correo: String::new(),
            contrasena: "abc".to_string(),
            telefono: None,
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SyncError::Validation {
            missing_fields: vec![
                "nombre_usuario".to_string(),
                "correo".to_string(),
                "contraseña".to_string(),
            ],
        }
    );
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn short_password_alone_blocks_registration() {
    let backend = FakeBackend::new();
    let auth = AuthApi::new(client(&backend).await);

    let err = auth
        .register(&UsuarioNuevo {
            nombre_usuario: "ana".to_string(),
            correo: "ana@correo.com".to_string(),
            contrasena: "12345".to_string(),
            telefono: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Validation { ref missing_fields } if missing_fields == &["contraseña"]));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn category_catalog_filters_server_side_and_loads_once() {
    let backend = FakeBackend::new();
    backend.respond(
        Method::GET,
        "/categorias",
        json!([
            { "id": 1, "nombre": "Sueldo", "tipo": "ingreso" },
            { "id": 2, "nombre": "Comida", "tipo": "gasto" },
        ]),
    );
    let mut catalog = CategoryCatalog::new(client(&backend).await);

    catalog.load(Some(TipoCategoria::Gasto)).await.unwrap();
    catalog.ensure_loaded().await.unwrap();

    let requests = backend.requests_for(Method::GET, "/categorias");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query.as_deref(), Some("tipo=gasto"));
    assert!(catalog.is_loaded());
    assert_eq!(catalog.for_tipo(TipoCategoria::Ingreso).len(), 1);
    assert_eq!(catalog.find(2).map(|c| c.nombre.as_str()), Some("Comida"));
}

#[tokio::test]
async fn profile_edit_goes_through_a_form_session() {
    let backend = FakeBackend::new();
    let usuario = json!({ "id": 1, "nombre_usuario": "ana", "correo": "ana@correo.com" });
    backend.respond(Method::GET, "/usuarios/1", usuario.clone());
    backend.seed("usuarios", vec![usuario]);
    let profile = ProfileController::new(client(&backend).await, 1);

    let loaded = profile.load().await.unwrap();
    let mut form = FormSessionController::new(&ResourceKind::USUARIOS);
    form.begin_edit(&loaded).unwrap();
    form.set_field("telefono", "555-0101");
    form.submit(&profile).await.unwrap();

    let puts = backend.requests_for(Method::PUT, "/usuarios/1");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].body.as_ref().unwrap()["telefono"], json!("555-0101"));
    let stored = profile.profile().unwrap();
    assert_eq!(stored.get("telefono"), Some(&json!("555-0101")));
}

#[tokio::test]
async fn profile_cannot_be_created_from_a_form() {
    let backend = FakeBackend::new();
    let profile = ProfileController::new(client(&backend).await, 1);
    let mut form = FormSessionController::new(&ResourceKind::USUARIOS);

    form.begin_create();
    form.set_field("nombre_usuario", "otra");
    form.set_field("correo", "otra@correo.com");
    let err = form.submit(&profile).await.unwrap_err();

    assert!(matches!(err, SyncError::Unsupported(_)));
    assert!(backend.requests().is_empty());
    assert!(form.is_open());
}

#[tokio::test]
async fn profile_rejects_edits_of_another_user() {
    let backend = FakeBackend::new();
    let profile = ProfileController::new(client(&backend).await, 1);
    let other = Resource::from_json(
        json!({ "id": 2, "nombre_usuario": "otra", "correo": "otra@correo.com" }),
    )
    .unwrap();
    let mut form = FormSessionController::new(&ResourceKind::USUARIOS);

    form.begin_edit(&other).unwrap();
    form.set_field("telefono", "555-0199");
    let err = form.submit(&profile).await.unwrap_err();

    assert!(matches!(err, SyncError::Unsupported(_)));
    assert!(backend.requests().is_empty());
    assert!(form.is_open());
    assert!(profile.profile().is_none());
}

#[tokio::test]
async fn failed_profile_load_keeps_nothing() {
    let backend = FakeBackend::new();
    backend.fail_next(
        StatusCode::NOT_FOUND,
        json!({ "detail": "Usuario no encontrado" }),
    );
    let profile = ProfileController::new(client(&backend).await, 5);

    let err = profile.load().await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.detail().as_deref(), Some("Usuario no encontrado"));
    assert!(profile.profile().is_none());
    assert_eq!(backend.requests_for(Method::GET, "/usuarios/5").len(), 1);
}

#[tokio::test]
async fn dashboard_extended_summary_and_category_totals() {
    let backend = FakeBackend::new();
    backend.respond(
        Method::GET,
        "/resumen-financiero",
        json!({
            "total_ingresos": 2000.0,
            "total_egresos": 1200.0,
            "total_ahorros": 300.0,
            "balance": 500.0,
        }),
    );
    backend.respond(
        Method::GET,
        "/graficas/categorias",
        json!([
            { "categoria": "Comida", "total": 450.0 },
            { "categoria": "Transporte", "total": 120.5 },
        ]),
    );
    let dashboard = DashboardApi::new(client(&backend).await);

    let resumen = dashboard.resumen_financiero(8).await.unwrap();
    let totales = dashboard
        .categorias(TipoTransaccion::Egreso, 8)
        .await
        .unwrap();

    assert_eq!(resumen.total_ahorros, Some(300.0));
    assert_eq!(resumen.balance, 500.0);
    assert_eq!(totales.len(), 2);
    assert_eq!(totales[1].categoria, "Transporte");
    assert_eq!(totales[1].total, 120.5);
    assert_eq!(
        backend.requests_for(Method::GET, "/resumen-financiero")[0]
            .query
            .as_deref(),
        Some("usuario_id=8")
    );
    assert_eq!(
        backend.requests_for(Method::GET, "/graficas/categorias")[0]
            .query
            .as_deref(),
        Some("tipo=egreso&usuario_id=8")
    );
}

#[tokio::test]
async fn dashboard_scopes_every_query_to_the_user() {
    let backend = FakeBackend::new();
    backend.respond(
        Method::GET,
        "/resumen",
        json!({ "total_ingresos": 1000.0, "total_egresos": 400.0, "balance": 600.0 }),
    );
    backend.respond(
        Method::GET,
        "/graficas/tendencias",
        json!([{ "mes": "2024-01", "total": 100.0 }, { "mes": "2024-02", "total": 80.0 }]),
    );
    backend.respond(
        Method::GET,
        "/pagos-fijos/3/balance-alerta",
        json!({ "balance": 200.0, "total_pagos_fijos": 500.0, "alerta": true }),
    );
    let dashboard = DashboardApi::new(client(&backend).await);

    let resumen = dashboard.resumen(3).await.unwrap();
    let tendencias = dashboard
        .tendencias(TipoTransaccion::Egreso, 3)
        .await
        .unwrap();
    let alerta = dashboard.balance_alerta(3).await.unwrap();

    assert_eq!(resumen.balance, 600.0);
    assert_eq!(tendencias.len(), 2);
    assert_eq!(tendencias[0].mes, "2024-01");
    assert!(alerta.alerta);
    assert_eq!(alerta.faltante, 0.0);
    assert_eq!(
        backend.requests_for(Method::GET, "/resumen")[0].query.as_deref(),
        Some("usuario_id=3")
    );
    assert_eq!(
        backend.requests_for(Method::GET, "/graficas/tendencias")[0]
            .query
            .as_deref(),
        Some("tipo=egreso&usuario_id=3")
    );
}

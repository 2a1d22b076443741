use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use chrono::Duration;
use service::auth::domain::LoginInput;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::{AuthService, TokenIssuer};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let tokens = TokenIssuer::new("secret", Duration::minutes(5), Duration::days(1));
    let svc = AuthService::new(repo.clone(), repo, tokens);

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let body = serde_json::json!({"email": "bench@example.com", "password": "Benchmark1", "full_name": "Bench"});
    rt.block_on(svc.register(body.as_object().unwrap())).unwrap();

    let login = || LoginInput {
        email: Some("bench@example.com".into()),
        username: None,
        password: Some("Benchmark1".into()),
    };
    c.bench_function("auth_login_verify", |b| {
        b.iter(|| rt.block_on(svc.login(login())).unwrap());
    });

    let unknown = || LoginInput {
        email: Some("nobody@example.com".into()),
        username: None,
        password: Some("Benchmark1".into()),
    };
    c.bench_function("auth_login_unknown_user", |b| {
        b.iter(|| rt.block_on(svc.login(unknown())).unwrap_err());
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use etude_core::UserId;
use etude_rbac::{AccessControl, Actor, Module, Permission, SystemRole};

/// The check sits on the hot path of every authorized action in the host
/// application, so regressions here are user-visible latency.
fn setup() -> (AccessControl, UserId) {
    let ac = AccessControl::new();
    let admin = Actor::new(UserId::new(), "bench-admin");
    let user = UserId::new();

    ac.assign_role(&admin, user, SystemRole::Clerc.id());
    ac.assign_role(&admin, user, SystemRole::Comptable.id());
    ac.assign_role(&admin, user, SystemRole::Viewer.id());

    (ac, user)
}

fn bench_single_check(c: &mut Criterion) {
    let (ac, user) = setup();

    let mut group = c.benchmark_group("permission_check");
    group.throughput(Throughput::Elements(1));

    group.bench_function("can_granted", |b| {
        b.iter(|| {
            black_box(ac.can(
                black_box(user),
                black_box(Module::Dossiers),
                black_box(Permission::Read),
            ))
        })
    });

    group.bench_function("can_denied", |b| {
        b.iter(|| {
            black_box(ac.can(
                black_box(user),
                black_box(Module::Admin),
                black_box(Permission::Delete),
            ))
        })
    });

    group.finish();
}

fn bench_batch_checks(c: &mut Criterion) {
    let (ac, user) = setup();
    let permissions = [Permission::Read, Permission::Create, Permission::Update];

    let mut group = c.benchmark_group("permission_check_batch");
    group.throughput(Throughput::Elements(permissions.len() as u64));

    group.bench_function("can_all", |b| {
        b.iter(|| black_box(ac.can_all(black_box(user), Module::Dossiers, &permissions)))
    });

    group.bench_function("permissions_of", |b| {
        b.iter(|| black_box(ac.permissions_of(black_box(user), Module::Comptabilite)))
    });

    group.finish();
}

criterion_group!(benches, bench_single_check, bench_batch_checks);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

use strongbox::error::{AuthError, DirectoryError};
use strongbox::identity::{
    AuthOutcome, AuthenticationOrchestrator, Authenticator, Directory, DirectoryEntry, DirectoryResolver,
};

/// Directory that times out with probability `fail_p`, otherwise answers with one entry.
struct FlakyDirectory {
    id: String,
    fail_p: f64,
    rng: Mutex<StdRng>,
}

impl FlakyDirectory {
    fn new(id: usize, fail_p: f64, seed: u64) -> Self {
        Self { id: format!("dir-{id}"), fail_p, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Directory for FlakyDirectory {
    fn id(&self) -> &str { &self.id }

    fn find_user(&self, username: &str) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        if self.rng.lock().gen_bool(self.fail_p) {
            return Err(DirectoryError::Timeout(self.id.clone()));
        }
        // Only the first directory knows the user; the rest answer "not found".
        if self.id == "dir-0" {
            Ok(vec![DirectoryEntry::new(self.id.clone(), username).with_org("acme")])
        } else {
            Ok(vec![])
        }
    }
}

struct FlakyAuthenticator {
    id: String,
    fail_p: f64,
    rng: Mutex<StdRng>,
}

impl Authenticator for FlakyAuthenticator {
    fn id(&self) -> &str { &self.id }

    fn authenticate(&self, _entry: &DirectoryEntry, _password: &str) -> Result<AuthOutcome, AuthError> {
        if self.rng.lock().gen_bool(self.fail_p) {
            Err(AuthError::Communication(self.id.clone()))
        } else {
            Ok(AuthOutcome::Success)
        }
    }
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.sampling_mode(SamplingMode::Flat);
    group.sample_size(50);

    for &n in &[1usize, 8, 32] {
        let dirs: Vec<FlakyDirectory> = (0..n).map(|i| FlakyDirectory::new(i, 0.3, 0xBEEF_CAFE + i as u64)).collect();
        let refs: Vec<&dyn Directory> = dirs.iter().map(|d| d as &dyn Directory).collect();
        let resolver = DirectoryResolver::default();
        group.bench_with_input(BenchmarkId::new("flaky_directories", n), &n, |b, _| {
            b.iter(|| {
                let out = resolver.resolve("alice", &refs, Some("acme"), 3);
                criterion::black_box(out.ok());
            });
        });
    }
    group.finish();
}

fn bench_authenticate(c: &mut Criterion) {
    let mut group = c.benchmark_group("authenticate");
    group.sampling_mode(SamplingMode::Flat);
    group.sample_size(50);

    let entry = DirectoryEntry::new("dir-0", "alice");
    for &n in &[1usize, 4, 16] {
        let auths: Vec<FlakyAuthenticator> = (0..n)
            .map(|i| FlakyAuthenticator { id: format!("auth-{i}"), fail_p: 0.8, rng: Mutex::new(StdRng::seed_from_u64(0xFACE_FEED + i as u64)) })
            .collect();
        let refs: Vec<&dyn Authenticator> = auths.iter().map(|a| a as &dyn Authenticator).collect();
        let orch = AuthenticationOrchestrator::default();
        group.bench_with_input(BenchmarkId::new("flaky_authenticators", n), &n, |b, _| {
            b.iter(|| criterion::black_box(orch.authenticate(&entry, "pw", &refs, 3)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_authenticate);
criterion_main!(benches);

use std::time::Instant;

use mpi::traits::*;
use structopt::StructOpt;

use spmv_bench::distribute::{Coordinator, Worker, COORDINATOR_RANK};
use spmv_bench::engine::{allgather_merge, run_rounds};
use spmv_bench::partition::{NnzPlan, RowPartition};
use spmv_bench::report::PhaseTimings;
use spmv_bench::utils::{ones, random_sparse_matrix};
use spmv_bench::{csr, kernels, verify, Vector};

#[macro_use]
extern crate log;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "spmv_bench",
    about = "Distributed sparse vs dense matrix-vector multiply benchmark"
)]
struct Opt {
    /// Matrix dimension
    n: usize,

    /// Probability that a matrix entry is zero, in [0, 1]
    sparsity: f64,

    /// Number of multiply-merge rounds per strategy
    iterations: usize,
}

fn main() {
    pretty_env_logger::init();
    // every rank parses its own copy of the invocation, so a malformed
    // one exits on every rank before any collective is entered
    let opt = Opt::from_args();

    let universe = mpi::initialize().expect("failed to initialize the process group");
    let world = universe.world();
    let rank = world.rank();
    let ranks = world.size() as usize;

    let partition = RowPartition::new(opt.n, ranks);
    if rank == COORDINATOR_RANK {
        coordinate(&world, &opt, &partition);
    } else {
        work(&world, &opt, &partition, rank as usize);
    }
}

/// Rank 0: generates the problem, drives distribution, runs both round
/// sequences, verifies, and reports. Barrier placement must match
/// [`work`] exactly; each timed phase is fenced on both sides.
fn coordinate<C: Communicator>(world: &C, opt: &Opt, partition: &RowPartition) {
    let n = opt.n;
    info!(
        "generating {n}x{n} matrix, sparsity {:.2}, {} ranks",
        opt.sparsity,
        partition.ranks()
    );
    let dense = random_sparse_matrix(n, opt.sparsity);
    let mut x = ones(n);
    let mut timings = PhaseTimings::default();
    let coordinator = Coordinator::new(world, partition);

    world.barrier();
    let total_timer = Instant::now();

    let timer = Instant::now();
    let mat = csr::from_dense(&dense);
    timings.csr_build = timer.elapsed();
    let plan = NnzPlan::new(mat.indptr().raw_storage(), partition);

    world.barrier();
    let timer = Instant::now();
    coordinator.broadcast_vector(&mut x);
    let slice = coordinator.scatter_csr(&mat, &plan);
    world.barrier();
    timings.distribution = timer.elapsed();

    world.barrier();
    let timer = Instant::now();
    run_rounds(
        opt.iterations,
        &mut x,
        |x| kernels::spmv_csr(&slice, x),
        allgather_merge(world, partition),
    );
    world.barrier();
    timings.sparse_compute = timer.elapsed();
    timings.sparse_total = total_timer.elapsed();
    let sparse_result = x.clone();

    // fresh seed for the dense sequence; nothing may bleed through from
    // the sparse pass or the verification is meaningless
    x.fill(1.0);
    let block = coordinator.scatter_dense(&dense);

    world.barrier();
    let timer = Instant::now();
    run_rounds(
        opt.iterations,
        &mut x,
        |x| kernels::mv_dense(&block, x),
        allgather_merge(world, partition),
    );
    world.barrier();
    timings.dense_total = timer.elapsed();
    let dense_result = x;

    verify::compare(&sparse_result, &dense_result, verify::TOLERANCE).print();
    timings.print(n, opt.sparsity, opt.iterations, partition.ranks());
}

/// Every other rank: mirrors the coordinator's collective calls in the
/// same order, holding only its own slices.
fn work<C: Communicator>(world: &C, opt: &Opt, partition: &RowPartition, rank: usize) {
    let mut x = Vector::zeros(opt.n);
    let worker = Worker::new(world, partition, rank);

    world.barrier();

    // coordinator is building the CSR representation
    world.barrier();
    worker.broadcast_vector(&mut x);
    let slice = worker.receive_csr();
    world.barrier();

    world.barrier();
    run_rounds(
        opt.iterations,
        &mut x,
        |x| kernels::spmv_csr(&slice, x),
        allgather_merge(world, partition),
    );
    world.barrier();

    x.fill(1.0);
    let block = worker.receive_dense(opt.n);

    world.barrier();
    run_rounds(
        opt.iterations,
        &mut x,
        |x| kernels::mv_dense(&block, x),
        allgather_merge(world, partition),
    );
    world.barrier();
}

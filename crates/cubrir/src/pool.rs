//! Sized worker pools for the decode and export fan-outs.

use crate::error::CubrirResult;

pub(crate) fn build(workers: usize) -> CubrirResult<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(std::io::Error::other)?;
    Ok(pool)
}

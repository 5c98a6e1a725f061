mod block;
mod galois;
#[cfg(test)]
mod rectifier;

pub(crate) use block::Block;

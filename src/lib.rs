// Library exports for fast5-demux
pub mod demux_index;
pub mod fast5_index;
pub mod fastq;
pub mod pack;
pub mod relocate;

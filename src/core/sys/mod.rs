pub mod fd;

pub use fd::FileDescriptor;

/// Docker daemon adapters
mod docker_source;

pub use docker_source::DockerSourceProvider;

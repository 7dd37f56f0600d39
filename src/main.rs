mod audio;
mod cache;
mod command;
mod config;
mod error;
mod library;
mod navigation;
mod player;
mod runtime;
mod session;
mod source;

#[cfg(test)]
mod testing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

pub mod dns;

pub use dns::{ChaosIdentity, HandleDnsQueryUseCase, ResolveQuestionsUseCase};

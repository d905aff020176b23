use kernel::id::{Id, markers};

pub type PostId = Id<markers::Post>;

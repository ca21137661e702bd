impl std::fmt::Debug for crate::Culture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Culture({})", self)
    }
}

impl std::fmt::Debug for crate::Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("x", &self.position.x)
            .field("y", &self.position.y)
            .field("culture", &format_args!("{}", &self.culture))
            .field("active", &self.active)
            .finish()
    }
}

impl std::fmt::Debug for crate::State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("t", &self.t)
            .field("agents", &self.agents.len())
            .field("active", &self.active_count)
            .field("cultures", &self.distinct_cultures)
            .field("regions", &self.regions.as_ref().map(|r| r.count()))
            .finish()
    }
}

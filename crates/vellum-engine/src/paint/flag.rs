bitflags::bitflags! {
    /// What a paint must recompute on its next update.
    ///
    /// The canvas only ever sends `empty()` ("use your own diff") or `all()`
    /// ("something outside invalidated everything"). Paints track the finer
    /// bits themselves and OR them into whatever their parent sent.
    pub struct UpdateFlag: u8 {
        /// Geometry changed.
        const PATH      = 0b0001;
        /// Fill or opacity changed.
        const COLOR     = 0b0010;
        /// Local or inherited transform changed.
        const TRANSFORM = 0b0100;
        /// Clip region changed.
        const CLIP      = 0b1000;
    }
}

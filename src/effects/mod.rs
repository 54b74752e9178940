pub(crate) mod blur;
pub(crate) mod grade;
pub(crate) mod motion;
pub(crate) mod parallax;
pub(crate) mod transitions;

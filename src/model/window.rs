use std::num::NonZeroU32;

/// An identifier representing a window.
///
/// Identity is all the layout cares about: the host owns the window itself.
/// This identifier is only valid for the lifetime of the process that owns it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WindowId {
    pub pid: i32,
    pub idx: NonZeroU32,
}

impl serde::ser::Serialize for WindowId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("WindowId", 2)?;
        s.serialize_field("pid", &self.pid)?;
        s.serialize_field("idx", &self.idx.get())?;
        s.end()
    }
}

impl<'de> serde::de::Deserialize<'de> for WindowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        struct WindowIdVisitor;
        impl<'de> serde::de::Visitor<'de> for WindowIdVisitor {
            type Value = WindowId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str(
                    "a WindowId struct (with fields `pid` and `idx`) or a tuple (pid, idx)",
                )
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<WindowId, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let pid: i32 = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                let idx: u32 = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                let idx = NonZeroU32::new(idx)
                    .ok_or_else(|| serde::de::Error::custom("idx must be non-zero"))?;
                Ok(WindowId { pid, idx })
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: serde::de::MapAccess<'de>,
            {
                let mut pid: Option<i32> = None;
                let mut idx: Option<u32> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "pid" => pid = Some(map.next_value()?),
                        "idx" => idx = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                let pid = pid.ok_or_else(|| serde::de::Error::missing_field("pid"))?;
                let idx = idx.ok_or_else(|| serde::de::Error::missing_field("idx"))?;
                let idx = NonZeroU32::new(idx)
                    .ok_or_else(|| serde::de::Error::custom("idx must be non-zero"))?;
                Ok(WindowId { pid, idx })
            }
        }

        deserializer.deserialize_struct("WindowId", &["pid", "idx"], WindowIdVisitor)
    }
}

impl WindowId {
    pub fn new(pid: i32, idx: u32) -> WindowId {
        WindowId {
            pid,
            idx: NonZeroU32::new(idx).unwrap(),
        }
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.pid, self.idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_named_fields() {
        let json = serde_json::to_string(&WindowId::new(12, 3)).unwrap();
        assert_eq!(json, r#"{"pid":12,"idx":3}"#);
        let back: WindowId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WindowId::new(12, 3));
    }

    #[test]
    fn ron_accepts_struct_and_tuple_forms() {
        let named: WindowId = ron::from_str("(pid: 4, idx: 2)").unwrap();
        assert_eq!(named, WindowId::new(4, 2));
        let tuple: WindowId = serde_json::from_str("[4, 2]").unwrap();
        assert_eq!(tuple, WindowId::new(4, 2));
    }

    #[test]
    fn zero_index_is_rejected() {
        assert!(serde_json::from_str::<WindowId>(r#"{"pid":1,"idx":0}"#).is_err());
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(WindowId::new(7, 9).to_string(), "7:9");
    }
}

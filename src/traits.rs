use crate::{Error, Vector};

/// Implements collect into `Vector` without hiding allocation failures.
pub trait VectorIterator: Iterator {
    fn collect_vector(self) -> Result<Vector<Self::Item>, Error>;

    fn collect_result_vector<I, E>(self) -> Result<Vector<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            E: From<Error>;
}

impl<Q: Iterator> VectorIterator for Q {
    fn collect_vector(self) -> Result<Vector<Self::Item>, Error> {
        let (lower, _) = self.size_hint();
        let mut vector = Vector::with_capacity(lower)?;
        for item in self {
            vector.push_back(item)?;
        }
        Ok(vector)
    }

    fn collect_result_vector<I, E>(self) -> Result<Vector<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            E: From<Error>
    {
        let (lower, _) = self.size_hint();
        let mut vector = Vector::with_capacity(lower)?;
        for item in self {
            vector.push_back(item?)?;
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod traits_tests {
    use crate::{Error, VectorIterator};

    #[test]
    fn collect_reserves_from_size_hint() {
        let items = (0..12).map(|v| v as i16).collect_vector().unwrap();
        assert_eq!(12, items.size());
        assert_eq!(12, items.capacity());
        for (i, (item, expected)) in items.iter().zip((0..12).map(|v| v as i16)).enumerate() {
            assert_eq!(*item, expected, "at index {}", i);
        }
    }

    #[test]
    fn collect_grows_past_size_hint() {
        let items = (0..20).filter(|v| v % 2 == 0).collect_vector().unwrap();
        assert_eq!(&[0, 2, 4, 6, 8, 10, 12, 14, 16, 18], items.as_slice());
    }

    #[test]
    fn collect_result_stops_at_first_error() {
        #[derive(Debug, PartialEq)]
        enum CollectError {
            Storage(Error),
            Odd(i32),
        }

        impl From<Error> for CollectError {
            fn from(e: Error) -> Self {
                CollectError::Storage(e)
            }
        }

        let ok = vec![2, 4, 6]
            .into_iter()
            .map(|v| if v % 2 == 0 { Ok(v) } else { Err(CollectError::Odd(v)) })
            .collect_result_vector()
            .unwrap();
        assert_eq!(&[2, 4, 6], ok.as_slice());

        let failed = vec![2, 3, 4]
            .into_iter()
            .map(|v| if v % 2 == 0 { Ok(v) } else { Err(CollectError::Odd(v)) })
            .collect_result_vector::<i32, CollectError>();
        assert_eq!(Some(CollectError::Odd(3)), failed.err());
    }
}

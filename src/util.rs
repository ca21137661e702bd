pub fn smaller_of_two<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

pub fn greater_of_two<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        a
    } else {
        b
    }
}

/// Borrow the `target` element mutably and the `neighbor` element shared at
/// the same time. The two indices must differ.
pub fn target_and_neighbor<T>(items: &mut [T], target: usize, neighbor: usize) -> (&mut T, &T) {
    debug_assert_ne!(target, neighbor);
    let (low, high) = items.split_at_mut(greater_of_two(target, neighbor));
    let lower = &mut low[smaller_of_two(target, neighbor)];
    let upper = &mut high[0];
    if target < neighbor {
        (lower, &*upper)
    } else {
        (upper, &*lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_and_neighbor_in_either_order() {
        let mut v = vec![10, 20, 30, 40];
        {
            let (t, n) = target_and_neighbor(&mut v, 3, 1);
            *t += *n;
        }
        {
            let (t, n) = target_and_neighbor(&mut v, 0, 2);
            *t = *n;
        }
        assert_eq!(v, vec![30, 20, 30, 60]);
    }
}

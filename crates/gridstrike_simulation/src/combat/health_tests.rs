//! Tests for Health.

#[cfg(test)]
mod tests {
    use crate::combat::Health;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(100);

        assert!(!health.take_damage(30));
        assert_eq!(health.current(), 70);
        assert!(health.is_alive());

        assert!(health.take_damage(500)); // Saturating sub
        assert_eq!(health.current(), 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_death_fires_once_regardless_of_granularity() {
        // Разные разбиения суммарного урона ≥ max
        let chunkings: [&[u32]; 5] = [
            &[100],
            &[1; 100],
            &[30, 30, 30, 30, 30],
            &[99, 0, 1, 50, 50],
            &[250],
        ];

        for chunks in chunkings {
            let mut health = Health::new(100);
            let deaths = chunks.iter().filter(|amount| health.take_damage(**amount)).count();

            assert_eq!(deaths, 1, "chunks {:?} fired {} deaths", chunks, deaths);
            assert_eq!(health.current(), 0);
        }
    }

    #[test]
    fn test_damage_below_max_never_kills() {
        let mut health = Health::new(100);
        let deaths = [10u32, 20, 30, 39].iter().filter(|amount| health.take_damage(**amount)).count();

        assert_eq!(deaths, 0);
        assert_eq!(health.current(), 1);
    }

    #[test]
    fn test_damage_after_death_is_noop() {
        let mut health = Health::new(10);
        assert!(health.take_damage(10));

        assert!(!health.take_damage(10));
        assert!(!health.take_damage(0));
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_health_normalized() {
        let mut health = Health::new(100);
        assert_eq!(health.health_normalized(), 1.0);

        health.take_damage(25);
        assert_eq!(health.health_normalized(), 0.75);

        health.take_damage(100);
        assert_eq!(health.health_normalized(), 0.0);

        assert_eq!(Health::new(0).health_normalized(), 0.0);
    }
}

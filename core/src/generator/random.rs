use super::*;

/// Uniform shuffle of the paired alphabet, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, config: GameConfig) -> Deck {
        use rand::prelude::*;

        if config.pairs > MAX_PAIRS {
            log::warn!(
                "Requested {} pairs but the alphabet only has {}, dealing {}",
                config.pairs,
                MAX_PAIRS,
                MAX_PAIRS
            );
        }

        let mut deck = Deck::ordered(config.pairs);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        // Fisher-Yates, every ordering is equally likely
        let symbols = deck.symbols_mut();
        for i in (1..symbols.len()).rev() {
            let j = rng.random_range(0..=i);
            symbols.swap(i, j);
        }

        log::trace!("dealt deck with seed {}: {:?}", self.seed, deck);
        deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_symbol_is_dealt_exactly_twice() {
        for seed in 0..50 {
            let deck = RandomDeckGenerator::new(seed).generate(GameConfig::default());

            assert_eq!(deck.len(), 16);
            for symbol in Symbol::alphabet(MAX_PAIRS) {
                assert_eq!(deck.iter().filter(|&s| s == symbol).count(), 2);
            }
        }
    }

    #[test]
    fn same_seed_deals_same_deck() {
        let config = GameConfig::default();

        assert_eq!(
            RandomDeckGenerator::new(7).generate(config),
            RandomDeckGenerator::new(7).generate(config)
        );
    }

    #[test]
    fn positions_are_roughly_uniform_over_symbols() {
        const ROUNDS: usize = 4000;
        let config = GameConfig::default();
        let pairs = usize::from(config.pairs);
        let mut counts = [[0usize; MAX_PAIRS as usize]; 2 * MAX_PAIRS as usize];

        for seed in 0..ROUNDS as u64 {
            let deck = RandomDeckGenerator::new(seed).generate(config);
            for (position, symbol) in deck.iter().enumerate() {
                counts[position][usize::from(symbol.index())] += 1;
            }
        }

        // expected 500 per cell, standard deviation is about 21
        let expected = ROUNDS / pairs;
        for row in &counts {
            for &count in row {
                assert!(
                    count.abs_diff(expected) < 150,
                    "count {} too far from {}",
                    count,
                    expected
                );
            }
        }
    }
}
